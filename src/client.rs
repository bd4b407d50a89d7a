//! # Portal Client
//!
//! The public façade. Each method checks the provider's capability flags,
//! validates its parameters, builds the listing from the provider's rule
//! tables and runs it through the pipeline.

use tracing::{info, instrument};

use crate::config::{ClientConfig, Session};
use crate::datetime::{DatePatterns, Locale};
use crate::error::{Error, ResponseKind, Result};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::models::{Event, ExamDoable, ExamReservation, FromCandidate, News, Tax};
use crate::pipeline::{Listing, ListingDriver, PageBounds};
use crate::provider::{ProviderConfig, sapienza};

/// Client for one university portal
pub struct PortalClient<F = HttpFetcher> {
    fetcher: F,
    provider: ProviderConfig,
    session: Option<Session>,
}

impl PortalClient<HttpFetcher> {
    /// Create a client performing real HTTP requests
    pub fn new(config: ClientConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetcher)?;
        info!("Created client for provider {}", config.provider.name);
        Ok(Self {
            fetcher,
            provider: config.provider,
            session: config.session,
        })
    }
}

impl<F: Fetcher> PortalClient<F> {
    /// Create a client on top of any fetcher
    pub fn with_fetcher(fetcher: F, provider: ProviderConfig) -> Self {
        Self {
            fetcher,
            provider,
            session: None,
        }
    }

    /// Use this session for the student API
    pub fn with_session(mut self, student_id: impl Into<String>, token: impl Into<String>) -> Self {
        self.session = Some(Session::new(student_id, token));
        self
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    fn require_feature(&self, enabled: bool, feature: &str) -> Result<()> {
        if enabled {
            Ok(())
        } else {
            Err(Error::FeatureNotSupported(format!(
                "{} does not support {}",
                self.provider.name, feature
            )))
        }
    }

    fn require_session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| Error::InvalidCredentials("no session, log in first".to_string()))
    }

    /// News articles, enriched from their article pages
    ///
    /// `page` selects one listing page, `max_page` reads pages `0..max_page`,
    /// `limit` caps the number of articles. At least one must be given.
    #[instrument(skip(self))]
    pub async fn news(
        &self,
        locale: Locale,
        with_description: bool,
        limit: Option<usize>,
        page: Option<u32>,
        max_page: Option<u32>,
        query: Option<&str>,
    ) -> Result<Vec<News>> {
        self.require_feature(self.provider.features.news, "news")?;
        let bounds = PageBounds::resolve(limit, page, max_page)?;

        let listing = sapienza::news_listing(&self.provider, locale, query)?;
        let detail = sapienza::news_detail(with_description);
        let dates = DatePatterns::for_locale(locale);

        ListingDriver::new(&self.fetcher, &dates)
            .run::<News>(&listing, bounds, Some(&detail))
            .await?
            .into_records(ResponseKind::Html)
    }

    /// Events announced in the newsletter, one per scheduled date
    #[instrument(skip(self))]
    pub async fn newsletter_events(&self) -> Result<Vec<Event>> {
        self.require_feature(self.provider.features.news, "newsletter events")?;

        let listing = sapienza::newsletter_listing(&self.provider)?;
        let detail = sapienza::event_detail();
        let dates = sapienza::event_dates();

        ListingDriver::new(&self.fetcher, &dates)
            .run::<Event>(&listing, PageBounds::default(), Some(&detail))
            .await?
            .into_records(ResponseKind::Html)
    }

    #[instrument(skip(self))]
    pub async fn exams_doable(&self) -> Result<Vec<ExamDoable>> {
        self.require_feature(self.provider.features.exams, "exams")?;
        let session = self.require_session()?;
        let listing = sapienza::exams_doable(&self.provider, &session.student_id, &session.token)?;
        self.run_json(&listing).await
    }

    #[instrument(skip(self))]
    pub async fn active_reservations(&self) -> Result<Vec<ExamReservation>> {
        self.require_feature(self.provider.features.exams, "exams")?;
        let session = self.require_session()?;
        let listing =
            sapienza::active_reservations(&self.provider, &session.student_id, &session.token)?;
        self.run_json(&listing).await
    }

    /// Sessions open for booking for one exam
    #[instrument(skip(self, exam), fields(exam = %exam.exam_code))]
    pub async fn available_reservations(&self, exam: &ExamDoable) -> Result<Vec<ExamReservation>> {
        self.require_feature(self.provider.features.exams, "exams")?;
        let session = self.require_session()?;
        let listing = sapienza::available_reservations(
            &self.provider,
            &session.student_id,
            &session.token,
            &exam.course_code,
            &exam.exam_code,
        )?;
        self.run_json(&listing).await
    }

    #[instrument(skip(self))]
    pub async fn paid_taxes(&self) -> Result<Vec<Tax>> {
        self.taxes(true).await
    }

    #[instrument(skip(self))]
    pub async fn unpaid_taxes(&self) -> Result<Vec<Tax>> {
        self.taxes(false).await
    }

    async fn taxes(&self, paid: bool) -> Result<Vec<Tax>> {
        self.require_feature(self.provider.features.taxes, "taxes")?;
        let session = self.require_session()?;
        let listing = sapienza::taxes(&self.provider, &session.student_id, &session.token, paid)?;
        self.run_json(&listing).await
    }

    async fn run_json<T: FromCandidate>(&self, listing: &Listing) -> Result<Vec<T>> {
        let dates = sapienza::api_dates();
        ListingDriver::new(&self.fetcher, &dates)
            .run_json::<T>(listing)
            .await?
            .into_records(ResponseKind::Json)
    }
}

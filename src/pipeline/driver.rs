use tracing::{debug, info, instrument, warn};
use url::Url;

use super::PageBounds;
use crate::aggregate::{AggregateResult, ExtractionOutcome, FailureAggregator, FailureReason};
use crate::datetime::DatePatterns;
use crate::document::{Document, parse_json};
use crate::error::{Error, ResponseKind, Result};
use crate::extract::{CandidateRecord, ExtractError, Extraction, RuleSet, extract_html, extract_json};
use crate::fetch::{FetchRequest, Fetcher, Page};
use crate::models::FromCandidate;

/// A paginated listing endpoint
#[derive(Debug, Clone)]
pub struct Listing {
    pub url: Url,
    /// Name of the page number query parameter, `None` for single-page listings
    pub page_param: Option<String>,
    /// Fixed query parameters sent after the page number
    pub params: Vec<(String, String)>,
    pub rules: RuleSet,
}

impl Listing {
    pub fn new(url: Url, rules: RuleSet) -> Self {
        Self {
            url,
            page_param: Some("page".to_string()),
            params: Vec::new(),
            rules,
        }
    }

    pub fn page_param(mut self, name: &str) -> Self {
        self.page_param = Some(name.to_string());
        self
    }

    /// Never send a page number
    pub fn unpaged(mut self) -> Self {
        self.page_param = None;
        self
    }

    pub fn param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    fn request(&self, page: Option<u32>) -> FetchRequest {
        let request = FetchRequest::get(self.url.clone());
        let request = match (&self.page_param, page) {
            (Some(name), Some(page)) => request.param(name.clone(), page.to_string()),
            _ => request,
        };
        self.params
            .iter()
            .fold(request, |request, (k, v)| request.param(k.clone(), v.clone()))
    }
}

/// How to enrich a listing item from its own page
#[derive(Debug, Clone)]
pub struct DetailSpec {
    /// Field of the listing candidate holding the detail URL
    pub url_field: String,
    /// Rules applied once to the whole detail page
    pub page_rules: RuleSet,
    /// Rules for repeated blocks; each usable block yields one record
    pub block_rules: Option<RuleSet>,
}

impl DetailSpec {
    pub fn new(url_field: &str, page_rules: RuleSet) -> Self {
        Self {
            url_field: url_field.to_string(),
            page_rules,
            block_rules: None,
        }
    }

    pub fn blocks(mut self, rules: RuleSet) -> Self {
        self.block_rules = Some(rules);
        self
    }
}

/// What a detail page contributed to one item
enum Detail {
    /// Fields to merge, plus the usable blocks when block rules are set
    Found {
        page: Option<CandidateRecord>,
        blocks: Option<Vec<CandidateRecord>>,
    },
    /// The detail page itself lacked a required field
    Failed(ExtractionOutcome<CandidateRecord>),
}

fn parse_listing(page: &Page, rules: &RuleSet) -> Result<Extraction> {
    match Document::parse(&page.body, page.url.clone()) {
        Ok(document) => Ok(extract_html(&document, rules)?),
        Err(ExtractError::EmptyDocument(_)) => Ok(Extraction {
            containers: 0,
            outcomes: Vec::new(),
        }),
        Err(e) => Err(e.into()),
    }
}

fn parse_detail(page: &Page, spec: &DetailSpec) -> Result<Detail> {
    let document = Document::parse(&page.body, page.url.clone())?;

    let mut merged = None;
    if let Some(outcome) = extract_html(&document, &spec.page_rules)?.outcomes.into_iter().next() {
        match outcome {
            ExtractionOutcome::Record(candidate) => merged = Some(candidate),
            failure => return Ok(Detail::Failed(failure)),
        }
    }

    let blocks = match &spec.block_rules {
        Some(rules) => {
            let extraction = extract_html(&document, rules)?;
            let mut usable = Vec::new();
            for outcome in extraction.outcomes {
                match outcome {
                    ExtractionOutcome::Record(block) => usable.push(block),
                    other => {
                        if let Some(failure) = other.failure() {
                            debug!("Ignoring block on {}: {}", page.url, failure);
                        }
                    }
                }
            }
            Some(usable)
        }
        None => None,
    };

    Ok(Detail::Found {
        page: merged,
        blocks,
    })
}

/// Drives fetch, parse, extract and aggregate over a listing
///
/// Every fetch is awaited before the next one starts. The driver keeps no
/// state between runs.
pub struct ListingDriver<'a, F> {
    fetcher: &'a F,
    dates: &'a DatePatterns,
}

impl<'a, F: Fetcher> ListingDriver<'a, F> {
    pub fn new(fetcher: &'a F, dates: &'a DatePatterns) -> Self {
        Self { fetcher, dates }
    }

    /// Run an HTML listing over `bounds`, optionally enriching each item
    ///
    /// Listing-page fetch failures end the run with a classified error. When
    /// every visited page lacks containers the run fails with `empty-listing`.
    #[instrument(skip_all, fields(url = %listing.url, pages = ?bounds.pages()))]
    pub async fn run<T: FromCandidate>(
        &self,
        listing: &Listing,
        bounds: PageBounds,
        detail: Option<&DetailSpec>,
    ) -> Result<AggregateResult<T>> {
        let mut aggregator = FailureAggregator::new();
        let mut iterations = 0;
        let mut misses = 0;

        'pages: for page_number in bounds.pages() {
            let page = self.fetcher.fetch(listing.request(Some(page_number))).await?;
            let extraction = parse_listing(&page, &listing.rules)?;
            iterations += 1;

            if extraction.is_miss() {
                warn!("Page {} of {} has no items", page_number, listing.url);
                misses += 1;
                continue;
            }
            debug!(
                "Page {} has {} items",
                page_number,
                extraction.outcomes.len()
            );

            for outcome in extraction.outcomes {
                if bounds.is_full(aggregator.record_count()) {
                    break 'pages;
                }
                match (outcome, detail) {
                    (ExtractionOutcome::Record(candidate), Some(spec)) => {
                        let outcomes = self.enrich::<T>(candidate, spec).await;
                        aggregator.push_all(outcomes);
                    }
                    (outcome, _) => {
                        aggregator.push(outcome.and_then(|c| T::outcome(&c, self.dates)));
                    }
                }
            }

            if bounds.is_full(aggregator.record_count()) {
                debug!("Limit reached on page {}", page_number);
                break;
            }
        }

        if iterations > 0 && iterations == misses {
            return Err(Error::invalid_response(
                ResponseKind::Html,
                format!(
                    "{}: reason: {}",
                    ResponseKind::Html.label(),
                    FailureReason::EmptyListing
                ),
            ));
        }

        let mut result = aggregator.finalize();
        if let Some(limit) = bounds.limit {
            result.records.truncate(limit);
        }
        info!(
            "Listing produced {} records from {} items",
            result.records.len(),
            result.processed
        );
        Ok(result)
    }

    /// Run a JSON listing with a single request
    #[instrument(skip_all, fields(url = %listing.url))]
    pub async fn run_json<T: FromCandidate>(&self, listing: &Listing) -> Result<AggregateResult<T>> {
        let page = self.fetcher.fetch(listing.request(None)).await?;
        let value = parse_json(&page.body)?;
        let extraction = extract_json(&value, &listing.rules, &page.url)?;

        let result = AggregateResult::from_outcomes(
            extraction
                .outcomes
                .into_iter()
                .map(|outcome| outcome.and_then(|c| T::outcome(&c, self.dates))),
        );
        info!(
            "Listing produced {} records from {} items",
            result.records.len(),
            result.processed
        );
        Ok(result)
    }

    /// Fetch the detail page of one item and turn it into outcomes
    async fn enrich<T: FromCandidate>(
        &self,
        mut candidate: CandidateRecord,
        spec: &DetailSpec,
    ) -> Vec<ExtractionOutcome<T>> {
        let url = match candidate.url(&spec.url_field) {
            Some(url) => url,
            None => {
                return vec![ExtractionOutcome::failed(
                    FailureReason::InvalidUrl,
                    Error::invalid_response(
                        ResponseKind::Html,
                        format!("item {} has no detail URL", candidate.index),
                    ),
                )];
            }
        };

        let page = match self.fetcher.fetch(FetchRequest::get(url.clone())).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Skipping item {}: detail fetch for {} failed: {}", candidate.index, url, e);
                return vec![ExtractionOutcome::skipped(FailureReason::DetailFetchFailed, e)];
            }
        };

        match parse_detail(&page, spec) {
            Err(e) => {
                warn!("Skipping item {}: detail page {} unusable: {}", candidate.index, url, e);
                vec![ExtractionOutcome::skipped(FailureReason::DetailFetchFailed, e)]
            }
            Ok(Detail::Failed(failure)) => {
                vec![failure.and_then(|c| T::outcome(&c, self.dates))]
            }
            Ok(Detail::Found { page, blocks }) => {
                if let Some(fields) = page {
                    candidate.merge(fields);
                }
                match blocks {
                    None => vec![T::outcome(&candidate, self.dates)],
                    Some(blocks) if blocks.is_empty() => {
                        warn!("Skipping item {}: no schedule on {}", candidate.index, url);
                        vec![ExtractionOutcome::skipped(
                            FailureReason::NoSchedule,
                            Error::invalid_response(
                                ResponseKind::Html,
                                format!("no usable date blocks on {}", url),
                            ),
                        )]
                    }
                    Some(blocks) => blocks
                        .into_iter()
                        .map(|block| {
                            let mut occurrence = candidate.clone();
                            occurrence.merge(block);
                            T::outcome(&occurrence, self.dates)
                        })
                        .collect(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::Locale;
    use crate::extract::FieldRule;
    use crate::fetch::MockFetcher;
    use crate::models::{Event, News};
    use std::error::Error as _;

    const LISTING_URL: &str = "https://portal.test/it/tutte-le-notizie";

    fn news_listing() -> Listing {
        Listing::new(
            Url::parse(LISTING_URL).unwrap(),
            RuleSet::new(".box-news")
                .field(FieldRule::attr("title", "img[title]", "title").required())
                .field(FieldRule::attr("url", "a[href]", "href").required().link())
                .field(FieldRule::attr("small_image", "img[src]", "src").link())
                .title("title"),
        )
    }

    fn news_detail() -> DetailSpec {
        DetailSpec::new(
            "url",
            RuleSet::new("html")
                .field(FieldRule::text("description", "[class$=testosommario] .field-item.even"))
                .field(FieldRule::text("date", ".date-display-single"))
                .field(FieldRule::attr("image", ".img-responsive[src]", "src").link()),
        )
    }

    fn listing_page(slugs: &[&str]) -> String {
        let boxes: String = slugs
            .iter()
            .map(|slug| {
                format!(
                    r#"<div class="box-news"><a href="/it/notizia/{slug}"><img title="News {slug}" src="/img/{slug}.jpg"></a></div>"#
                )
            })
            .collect();
        format!("<html><body>{}</body></html>", boxes)
    }

    fn detail_page(slug: &str) -> String {
        format!(
            r#"<html><body>
                <div class="date-display-single">Martedì, 12 marzo 2024</div>
                <div class="field-name-testosommario"><div class="field-item even">About {slug}</div></div>
                <img class="img-responsive" src="/img/{slug}-large.jpg">
            </body></html>"#
        )
    }

    fn page_url(page: u32) -> String {
        format!("{}?page={}", LISTING_URL, page)
    }

    fn detail_url(slug: &str) -> String {
        format!("https://portal.test/it/notizia/{}", slug)
    }

    fn italian() -> DatePatterns {
        DatePatterns::for_locale(Locale::Italian)
    }

    #[tokio::test]
    async fn test_listing_without_detail() {
        let fetcher = MockFetcher::new().with_page(&page_url(0), listing_page(&["a", "b"]));
        let dates = italian();
        let driver = ListingDriver::new(&fetcher, &dates);

        let result: AggregateResult<News> = driver
            .run(&news_listing(), PageBounds::resolve(None, Some(0), None).unwrap(), None)
            .await
            .unwrap();

        assert_eq!(result.processed, 2);
        assert_eq!(result.records[0].title, "News a");
        assert_eq!(result.records[1].url.as_str(), "https://portal.test/it/notizia/b");
        assert_eq!(
            result.records[1].small_image_url.as_deref(),
            Some("https://portal.test/img/b.jpg")
        );
    }

    #[tokio::test]
    async fn test_limit_stops_before_next_page() {
        let slugs: Vec<String> = (0..20).map(|i| format!("n{}", i)).collect();
        let slug_refs: Vec<&str> = slugs.iter().map(String::as_str).collect();
        let fetcher = MockFetcher::new()
            .with_page(&page_url(0), listing_page(&slug_refs))
            .with_page(&page_url(1), listing_page(&["late"]));
        let dates = italian();
        let driver = ListingDriver::new(&fetcher, &dates);

        let records = driver
            .run::<News>(
                &news_listing(),
                PageBounds::resolve(Some(5), None, Some(3)).unwrap(),
                None,
            )
            .await
            .unwrap()
            .into_records(ResponseKind::Html)
            .unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(records[4].title, "News n4");
        assert_eq!(fetcher.requests(), vec![page_url(0)]);
    }

    #[tokio::test]
    async fn test_limit_counts_records_after_detail() {
        let fetcher = MockFetcher::new()
            .with_page(&page_url(0), listing_page(&["a", "b", "c", "d"]))
            .with_status(&detail_url("a"), 404)
            .with_page(&detail_url("b"), detail_page("b"))
            .with_page(&detail_url("c"), detail_page("c"))
            .with_page(&detail_url("d"), detail_page("d"));
        let dates = italian();
        let driver = ListingDriver::new(&fetcher, &dates);

        let records = driver
            .run::<News>(
                &news_listing(),
                PageBounds::resolve(Some(2), None, None).unwrap(),
                Some(&news_detail()),
            )
            .await
            .unwrap()
            .into_records(ResponseKind::Html)
            .unwrap();

        let titles: Vec<&str> = records.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["News b", "News c"]);
        assert!(!fetcher.requests().contains(&detail_url("d")));
    }

    #[tokio::test]
    async fn test_all_pages_miss() {
        let fetcher = MockFetcher::new()
            .with_page(&page_url(0), "<html><body><p>Nessun risultato</p></body></html>")
            .with_page(&page_url(1), "<html><body></body></html>");
        let dates = italian();
        let driver = ListingDriver::new(&fetcher, &dates);

        let err = driver
            .run::<News>(
                &news_listing(),
                PageBounds::resolve(None, None, Some(2)).unwrap(),
                Some(&news_detail()),
            )
            .await
            .unwrap_err();

        assert!(err.is_html_error());
        assert!(err.to_string().contains("empty-listing"));
    }

    #[tokio::test]
    async fn test_some_pages_miss() {
        let fetcher = MockFetcher::new()
            .with_page(&page_url(0), listing_page(&["a"]))
            .with_page(&page_url(1), "<html><body></body></html>");
        let dates = italian();
        let driver = ListingDriver::new(&fetcher, &dates);

        let result = driver
            .run::<News>(
                &news_listing(),
                PageBounds::resolve(None, None, Some(2)).unwrap(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(result.records.len(), 1);
    }

    #[tokio::test]
    async fn test_partial_detail_failure_is_silent() {
        let fetcher = MockFetcher::new()
            .with_page(&page_url(0), listing_page(&["a", "b", "c", "d", "e"]))
            .with_page(&detail_url("a"), detail_page("a"))
            .with_status(&detail_url("b"), 500)
            .with_page(&detail_url("c"), detail_page("c"))
            .with_unreachable(&detail_url("d"))
            .with_page(&detail_url("e"), detail_page("e"));
        let dates = italian();
        let driver = ListingDriver::new(&fetcher, &dates);

        let result = driver
            .run::<News>(
                &news_listing(),
                PageBounds::resolve(None, Some(0), None).unwrap(),
                Some(&news_detail()),
            )
            .await
            .unwrap();

        assert_eq!(result.processed, 5);
        assert_eq!(
            result.histogram.get(&FailureReason::DetailFetchFailed),
            Some(&2)
        );

        let records = result.into_records(ResponseKind::Html).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].description.as_deref(), Some("About a"));
        assert_eq!(
            records[0].image_url.as_deref(),
            Some("https://portal.test/img/a-large.jpg")
        );
        assert!(records[0].date.is_some());
    }

    #[tokio::test]
    async fn test_all_details_fail_names_reason() {
        let fetcher = MockFetcher::new()
            .with_page(&page_url(0), listing_page(&["a", "b"]))
            .with_status(&detail_url("a"), 500)
            .with_status(&detail_url("b"), 404);
        let dates = italian();
        let driver = ListingDriver::new(&fetcher, &dates);

        let err = driver
            .run::<News>(
                &news_listing(),
                PageBounds::resolve(None, Some(0), None).unwrap(),
                Some(&news_detail()),
            )
            .await
            .unwrap()
            .into_records(ResponseKind::Html)
            .unwrap_err();

        assert!(err.to_string().ends_with("invalid HTML: reason: detail-fetch-failed"));
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn test_listing_fetch_failure_is_terminal() {
        let fetcher = MockFetcher::new().with_status(&page_url(0), 503);
        let dates = italian();
        let driver = ListingDriver::new(&fetcher, &dates);

        let err = driver
            .run::<News>(&news_listing(), PageBounds::default(), None)
            .await
            .unwrap_err();
        assert!(err.is_maintenance());

        let fetcher = MockFetcher::new().with_unreachable(&page_url(0));
        let driver = ListingDriver::new(&fetcher, &dates);
        let err = driver
            .run::<News>(&news_listing(), PageBounds::default(), None)
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_runs_are_idempotent() {
        let fetcher = MockFetcher::new()
            .with_page(&page_url(0), listing_page(&["a", "b"]))
            .with_page(&detail_url("a"), detail_page("a"))
            .with_page(&detail_url("b"), detail_page("b"));
        let dates = italian();
        let driver = ListingDriver::new(&fetcher, &dates);
        let bounds = PageBounds::default();

        let first = driver
            .run::<News>(&news_listing(), bounds, Some(&news_detail()))
            .await
            .unwrap()
            .records;
        let second = driver
            .run::<News>(&news_listing(), bounds, Some(&news_detail()))
            .await
            .unwrap()
            .records;
        assert_eq!(first, second);
    }

    const NEWSLETTER_URL: &str = "https://portal.test/it/newsletter";

    fn event_listing() -> Listing {
        Listing::new(
            Url::parse(NEWSLETTER_URL).unwrap(),
            RuleSet::new(".event")
                .field(FieldRule::text("title", ".views-field-solr-document a").required())
                .field(FieldRule::attr("url", ".views-field-solr-document a", "href").required().link())
                .title("title"),
        )
        .unpaged()
    }

    fn event_detail() -> DetailSpec {
        DetailSpec::new(
            "url",
            RuleSet::new("html")
                .field(FieldRule::attr("image", ".field-type-image img", "src").link())
                .field(FieldRule::text("description", ".article-body")),
        )
        .blocks(
            RuleSet::new(".view-date-and-place .view-content > .views-row")
                .field(FieldRule::text("start", ".views-field-php.field-apm-date .field-content").required())
                .field(FieldRule::text("room", ".views-field-field-apm-aula .field-content"))
                .field(FieldRule::text("place", ".views-field-field-apm-edificio .field-content")),
        )
    }

    fn newsletter(slugs: &[&str]) -> String {
        let events: String = slugs
            .iter()
            .map(|slug| {
                format!(
                    r#"<div class="event"><div class="views-field-solr-document"><a href="/it/evento/{slug}">Evento {slug}</a></div></div>"#
                )
            })
            .collect();
        format!("<html><body>{}</body></html>", events)
    }

    fn block(date: &str, room: &str) -> String {
        format!(
            r#"<div class="views-row">
                <div class="views-field-php field-apm-date"><span class="field-content">{date}</span></div>
                <div class="views-field-field-apm-aula"><span class="field-content">{room}</span></div>
                <div class="views-field-field-apm-edificio"><span class="field-content">Rettorato</span></div>
            </div>"#
        )
    }

    fn event_page(blocks: &[String]) -> String {
        format!(
            r#"<html><body>
                <div class="field-type-image"><img src="/img/evento.jpg"></div>
                <div class="article-body">Un evento</div>
                <div class="view-date-and-place"><div class="view-content">{}</div></div>
            </body></html>"#,
            blocks.concat()
        )
    }

    fn event_url(slug: &str) -> String {
        format!("https://portal.test/it/evento/{}", slug)
    }

    #[tokio::test]
    async fn test_event_fan_out() {
        let fetcher = MockFetcher::new()
            .with_page(NEWSLETTER_URL, newsletter(&["concerto", "mostra", "rinviato"]))
            .with_page(
                &event_url("concerto"),
                event_page(&[
                    block("martedì 12 marzo 2024 alle 18:30", "Aula Magna - Piano terra"),
                    block("mercoledì 13 marzo 2024 alle 18:30", "Aula Magna"),
                ]),
            )
            .with_page(&event_url("mostra"), event_page(&[block("giovedì 14 marzo 2024 alle 10:00", "Aula 1")]))
            .with_page(&event_url("rinviato"), event_page(&[]));
        let dates = italian();
        let driver = ListingDriver::new(&fetcher, &dates);

        let result: AggregateResult<Event> = driver
            .run(&event_listing(), PageBounds::default(), Some(&event_detail()))
            .await
            .unwrap();

        assert_eq!(result.processed, 3);
        assert_eq!(result.histogram.get(&FailureReason::NoSchedule), Some(&1));

        let events = result.into_records(ResponseKind::Html).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].title, "Evento concerto");
        assert_eq!(events[0].room.as_deref(), Some("Aula Magna, Piano terra"));
        assert_eq!(events[1].title, "Evento concerto");
        assert_eq!(events[1].start.format("%d").to_string(), "13");
        assert_eq!(events[2].place.as_deref(), Some("Rettorato"));
        assert_eq!(
            events[2].image_url.as_deref(),
            Some("https://portal.test/img/evento.jpg")
        );
    }

    #[tokio::test]
    async fn test_event_blocks_with_bad_dates() {
        let fetcher = MockFetcher::new()
            .with_page(NEWSLETTER_URL, newsletter(&["a"]))
            .with_page(&event_url("a"), event_page(&[block("data da definire", "Aula 1")]));
        let dates = italian();
        let driver = ListingDriver::new(&fetcher, &dates);

        let err = driver
            .run::<Event>(&event_listing(), PageBounds::default(), Some(&event_detail()))
            .await
            .unwrap()
            .into_records(ResponseKind::Html)
            .unwrap_err();
        assert!(err.to_string().ends_with("reason: invalid-date"));
    }

    #[tokio::test]
    async fn test_json_listing() {
        let url = "https://api.portal.test/contabilita/123/bollettinipagati";
        let fetcher = MockFetcher::new().with_page(
            &format!("{}?ingresso=tok", url),
            r#"{"risultatoLista": {"risultati": [
                {"codiceBollettino": "A1", "importoBollettino": "156,50", "dataPagamento": "15/01/2024"},
                {"codiceBollettino": "A2", "importoBollettino": "oops"}
            ]}}"#,
        );
        let dates = DatePatterns::new(Locale::Italian, ["%d/%m/%Y"]);
        let driver = ListingDriver::new(&fetcher, &dates);
        let listing = Listing::new(
            Url::parse(url).unwrap(),
            RuleSet::new("/risultatoLista/risultati")
                .field(FieldRule::pointer("code", "/codiceBollettino").required())
                .field(FieldRule::pointer("amount", "/importoBollettino").required())
                .field(FieldRule::pointer("payment_date", "/dataPagamento")),
        )
        .param("ingresso", "tok");

        let result = driver.run_json::<crate::models::Tax>(&listing).await.unwrap();
        assert_eq!(result.processed, 2);
        assert_eq!(result.histogram.get(&FailureReason::InvalidField), Some(&1));
        let taxes = result.into_records(ResponseKind::Json).unwrap();
        assert_eq!(taxes.len(), 1);
        assert_eq!(taxes[0].amount, 156.5);
    }

    #[tokio::test]
    async fn test_json_listing_errors() {
        let url = "https://api.portal.test/prenotazioni/123/";
        let fetcher = MockFetcher::new().with_page(url, "<html>login</html>");
        let dates = DatePatterns::new(Locale::Italian, ["%d/%m/%Y"]);
        let driver = ListingDriver::new(&fetcher, &dates);
        let listing = Listing::new(Url::parse(url).unwrap(), RuleSet::new("/ritorno/appelli"));

        let err = driver
            .run_json::<crate::models::ExamReservation>(&listing)
            .await
            .unwrap_err();
        assert!(err.is_json_error());

        let fetcher = MockFetcher::new().with_status(url, 401);
        let driver = ListingDriver::new(&fetcher, &dates);
        let err = driver
            .run_json::<crate::models::ExamReservation>(&listing)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials(_)));
    }
}

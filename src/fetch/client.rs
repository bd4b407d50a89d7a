//! HTTP fetcher implementation backed by reqwest

use std::error::Error as StdError;
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::Arc;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Certificate, Client as ReqwestClient, Response};
use tracing::{Instrument, debug, debug_span, info, instrument, warn};

use super::{FetchError, FetchRequest, Fetcher, FetcherConfig, Page};

/// Fetcher that performs real HTTP requests
#[derive(Clone)]
pub struct HttpFetcher {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Attempts per request when the connection fails
    max_tries: u32,

    /// Optional politeness quota shared by clones
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl HttpFetcher {
    /// Create a new fetcher from the given configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let mut builder = ReqwestClient::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone());

        if let Some(dir) = &config.cert_dir {
            for certificate in load_root_certificates(dir)? {
                builder = builder.add_root_certificate(certificate);
            }
        }

        let client = builder.build()?;
        let limiter = config
            .requests_per_minute
            .and_then(NonZeroU32::new)
            .map(|rpm| Arc::new(RateLimiter::direct(Quota::per_minute(rpm))));

        Ok(Self {
            client,
            max_tries: config.max_tries.max(1),
            limiter,
        })
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(skip(self, request), fields(url = %request.url), level = "debug")]
    async fn fetch(&self, request: FetchRequest) -> Result<Page, FetchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            if let Some(limiter) = &self.limiter {
                limiter.until_ready().instrument(debug_span!("limiter")).await;
            }

            debug!("Sending GET request (attempt {})", attempt);
            let result = self
                .client
                .get(request.url.clone())
                .query(&request.query)
                .send()
                .await;

            match result {
                Ok(response) => return read_page(response).await,
                Err(e) if e.is_connect() && !is_tls_failure(&e) && attempt < self.max_tries => {
                    warn!(
                        "Connection to {} failed (attempt {}/{}): {}",
                        request.url, attempt, self.max_tries, e
                    );
                }
                Err(e) => return Err(classify(e)),
            }
        }
    }
}

/// Read the response body, turning non-success statuses into errors
async fn read_page(response: Response) -> Result<Page, FetchError> {
    let status = response.status();
    let url = response.url().clone();
    let body = response.text().await.map_err(classify)?;

    if !status.is_success() {
        debug!("Unexpected status {} for {}", status, url);
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(Page {
        url,
        status: status.as_u16(),
        body,
    })
}

/// Full message of an error and its sources
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn is_tls_failure(err: &reqwest::Error) -> bool {
    let chain = error_chain(err).to_lowercase();
    ["certificate", "handshake", "tls", "ssl"]
        .iter()
        .any(|needle| chain.contains(needle))
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(error_chain(&err))
    } else if is_tls_failure(&err) {
        FetchError::Tls(error_chain(&err))
    } else if err.is_connect() {
        FetchError::Connection(error_chain(&err))
    } else {
        FetchError::Http(err)
    }
}

/// Load every `.pem`/`.crt` file of a directory as an extra trust root
///
/// A missing directory yields no certificates. Files that fail to parse are
/// skipped with a warning so that one bad file does not disable the others.
pub fn load_root_certificates(dir: &Path) -> Result<Vec<Certificate>, FetchError> {
    if !dir.is_dir() {
        warn!(
            "Certificate directory {} not found, using the system trust store only",
            dir.display()
        );
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| {
        FetchError::Certificate(format!("cannot list {}: {}", dir.display(), e))
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| matches!(ext, "pem" | "crt"))
        })
        .collect();
    paths.sort();

    let mut certificates = Vec::new();
    for path in paths {
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping certificate {}: {}", path.display(), e);
                continue;
            }
        };
        match Certificate::from_pem(&bytes) {
            Ok(certificate) => {
                debug!("Loaded certificate {}", path.display());
                certificates.push(certificate);
            }
            Err(e) => warn!("Skipping certificate {}: {}", path.display(), e),
        }
    }

    info!(
        "Loaded {} extra trust roots from {}",
        certificates.len(),
        dir.display()
    );
    Ok(certificates)
}

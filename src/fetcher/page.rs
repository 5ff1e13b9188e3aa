//! HTTP page fetcher
//!
//! This module performs one complete document retrieval:
//! - Building the HTTP client with the configured user agent and timeout
//! - Running the SSRF guard before every attempt
//! - GET request, status check, and text extraction
//! - Fixed-delay retry of transient failures

use crate::config::FetcherConfig;
use crate::fetcher::extract::extract_page;
use crate::fetcher::{Document, PageFetch};
use crate::url::UrlGuard;
use crate::{FetchError, ValidationError};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Upper bound on connection setup, independent of the per-attempt timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// Why a single attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
enum AttemptFailure {
    /// Transport error or non-success response
    Network(String),

    /// The page had no extractable text
    EmptyContent,

    /// A redirect pointed at a URL the guard rejects; never retried
    Blocked(ValidationError),
}

impl AttemptFailure {
    fn into_error(self, url: &str, attempts: u32) -> FetchError {
        match self {
            Self::Network(message) => FetchError::Network {
                url: url.to_string(),
                attempts,
                message,
            },
            Self::EmptyContent => FetchError::EmptyContent {
                url: url.to_string(),
                attempts,
            },
            Self::Blocked(e) => FetchError::Validation(e),
        }
    }
}

/// Builds an HTTP client for page fetching
///
/// Every redirect hop is checked with the same guard as the initial URL
/// (trusted hosts included), and at most [`MAX_REDIRECTS`] hops are followed.
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use krio_fetch::config::FetcherConfig;
/// use krio_fetch::fetcher::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let timeout = config.timeout();

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(timeout.min(CONNECT_TIMEOUT))
        .gzip(true)
        .brotli(true)
        .redirect(guarded_redirects(UrlGuard::with_trusted_hosts(
            config.trusted_hosts.iter().cloned(),
        )))
        .build()
}

/// Redirect policy that refuses hops failing URL validation
fn guarded_redirects(guard: UrlGuard) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }

        let verdict = guard.validate(attempt.url().as_str());
        match verdict {
            Ok(_) => attempt.follow(),
            Err(e) => {
                tracing::warn!("Blocked redirect to {}: {}", attempt.url(), e);
                attempt.error(e)
            }
        }
    })
}

/// Fetches and extracts single pages with validation and retry
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | URL fails validation | Immediate `Validation` error, no retry |
/// | Redirect to a URL that fails validation | Immediate `Validation` error, no retry |
/// | Transport error / timeout | Retry after fixed delay |
/// | Non-2xx status | Retry after fixed delay |
/// | Empty extracted text | Retry after fixed delay |
///
/// After `max_retries + 1` attempts the last failure is returned with the
/// attempt count.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    guard: UrlGuard,
    max_retries: u32,
    retry_delay: Duration,
}

impl PageFetcher {
    /// Creates a fetcher from configuration
    ///
    /// Hosts listed in `trusted_hosts` bypass the private-address check.
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            guard: UrlGuard::with_trusted_hosts(config.trusted_hosts.iter().cloned()),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
        })
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    ///
    /// # Returns
    ///
    /// * `Ok(Document)` - Page with non-empty content
    /// * `Err(FetchError)` - Validation failure, or the last attempt's error
    pub async fn fetch_page(&self, url: &str) -> Result<Document, FetchError> {
        let mut attempts = 0u32;

        loop {
            let target = self.guard.validate(url)?;
            attempts += 1;

            match self.fetch_once(url, target).await {
                Ok(document) => {
                    tracing::debug!(
                        "Fetched {} ({} chars) on attempt {}",
                        url,
                        document.content.chars().count(),
                        attempts
                    );
                    return Ok(document);
                }
                Err(AttemptFailure::Blocked(e)) => return Err(FetchError::Validation(e)),
                Err(failure) if attempts > self.max_retries => {
                    return Err(failure.into_error(url, attempts));
                }
                Err(failure) => {
                    tracing::debug!(
                        "Attempt {} for {} failed: {:?}, retrying in {:?}",
                        attempts,
                        url,
                        failure,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }

    /// Performs one request/extraction cycle
    async fn fetch_once(&self, url: &str, target: Url) -> Result<Document, AttemptFailure> {
        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptFailure::Network(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AttemptFailure::Network(format!("Failed to read body: {}", e)))?;

        let page = extract_page(&body);
        if page.content.is_empty() {
            return Err(AttemptFailure::EmptyContent);
        }

        Ok(Document {
            url: url.to_string(),
            title: page.title,
            content: page.content,
        })
    }
}

#[async_trait]
impl PageFetch for PageFetcher {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        self.fetch_page(url).await
    }
}

fn classify_transport_error(e: reqwest::Error) -> AttemptFailure {
    if let Some(blocked) = blocked_redirect(&e) {
        return AttemptFailure::Blocked(blocked);
    }

    if e.is_timeout() {
        AttemptFailure::Network("Request timeout".to_string())
    } else if e.is_connect() {
        AttemptFailure::Network(format!("Connection failed: {}", e))
    } else {
        AttemptFailure::Network(e.to_string())
    }
}

/// Finds a guard rejection raised by the redirect policy
fn blocked_redirect(e: &reqwest::Error) -> Option<ValidationError> {
    if !e.is_redirect() {
        return None;
    }

    let mut source = std::error::Error::source(e);
    while let Some(inner) = source {
        if let Some(blocked) = inner.downcast_ref::<ValidationError>() {
            return Some(blocked.clone());
        }
        source = inner.source();
    }
    None
}

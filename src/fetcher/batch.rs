//! Batch fetcher - cache-first, bounded-concurrency orchestration
//!
//! Each URL in a batch runs as its own tokio task. A task waits for one
//! permit from a shared semaphore before fetching, or gives up with a
//! `Cancelled` outcome if the cancellation token fires first. Finished tasks
//! send their outcome over a channel to a single collector, which is the only
//! writer of the result set.

use crate::cache::TtlCache;
use crate::config::Config;
use crate::fetcher::{Document, PageFetch, PageFetcher};
use crate::{ErrorKind, FetchError};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

/// Result of fetching one URL within a batch
#[derive(Debug)]
pub struct FetchOutcome {
    /// The requested URL
    pub url: String,

    /// The fetched document or the reason it could not be fetched
    pub result: Result<Document, FetchError>,
}

impl FetchOutcome {
    /// Returns the document if the fetch succeeded
    pub fn document(&self) -> Option<&Document> {
        self.result.as_ref().ok()
    }

    /// Returns the error if the fetch failed
    pub fn error(&self) -> Option<&FetchError> {
        self.result.as_ref().err()
    }

    /// Returns true if a document was fetched
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a batch, one per requested URL in request order
///
/// Duplicate URLs in the request produce one outcome each.
#[derive(Debug, Default)]
pub struct BatchResult {
    outcomes: Vec<FetchOutcome>,
}

impl BatchResult {
    /// Number of outcomes (equal to the number of requested URLs)
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true if the batch was empty
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Returns the first outcome for a URL
    pub fn get(&self, url: &str) -> Option<&FetchOutcome> {
        self.outcomes.iter().find(|o| o.url == url)
    }

    /// Returns every outcome for a URL, in request order
    pub fn get_all<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a FetchOutcome> + 'a {
        self.outcomes.iter().filter(move |o| o.url == url)
    }

    /// Iterates outcomes in request order
    pub fn iter(&self) -> std::slice::Iter<'_, FetchOutcome> {
        self.outcomes.iter()
    }

    /// Number of successful fetches
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of failed outcomes grouped by error kind
    pub fn failures_by_kind(&self) -> BTreeMap<ErrorKind, usize> {
        let mut counts = BTreeMap::new();
        for error in self.outcomes.iter().filter_map(FetchOutcome::error) {
            *counts.entry(error.kind()).or_insert(0) += 1;
        }
        counts
    }
}

impl IntoIterator for BatchResult {
    type Item = FetchOutcome;
    type IntoIter = std::vec::IntoIter<FetchOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a FetchOutcome;
    type IntoIter = std::slice::Iter<'a, FetchOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

/// Cache-first fetcher for single URLs and batches
///
/// Cloning is cheap; clones share the page fetcher and the cache.
#[derive(Clone)]
pub struct BatchFetcher {
    fetcher: Arc<dyn PageFetch>,
    cache: Option<Arc<TtlCache>>,
    cache_ttl: Duration,
    max_concurrency: usize,
}

impl BatchFetcher {
    /// Creates a batch fetcher
    ///
    /// # Arguments
    ///
    /// * `fetcher` - The underlying page source
    /// * `cache` - Document cache, or `None` to fetch every time
    /// * `cache_ttl` - Lifetime of cached documents
    /// * `max_concurrency` - Default admission limit used by [`fetch_all`](Self::fetch_all)
    pub fn new(
        fetcher: Arc<dyn PageFetch>,
        cache: Option<Arc<TtlCache>>,
        cache_ttl: Duration,
        max_concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            cache,
            cache_ttl,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Creates a batch fetcher backed by a network [`PageFetcher`]
    ///
    /// # Returns
    ///
    /// * `Ok(BatchFetcher)` - Ready to fetch
    /// * `Err(reqwest::Error)` - Failed to build the HTTP client
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let fetcher = Arc::new(PageFetcher::new(&config.fetcher)?);
        let cache = config.cache.enabled.then(|| Arc::new(TtlCache::new()));

        tracing::debug!(
            "Batch fetcher ready (cache: {}, ttl: {:?}, max concurrency: {})",
            config.cache.enabled,
            config.cache.ttl(),
            config.batch.max_concurrency
        );

        Ok(Self::new(
            fetcher,
            cache,
            config.cache.ttl(),
            config.batch.max_concurrency as usize,
        ))
    }

    /// Returns the document cache, if caching is enabled
    pub fn cache(&self) -> Option<&TtlCache> {
        self.cache.as_deref()
    }

    /// Number of cached entries (0 when caching is disabled)
    pub fn cache_size(&self) -> usize {
        self.cache.as_ref().map_or(0, |c| c.size())
    }

    /// Removes every cached document
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Default admission limit for [`fetch_all`](Self::fetch_all)
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Fetches one URL, serving it from the cache when possible
    ///
    /// On a miss the page fetcher is called once (it retries internally);
    /// a successful document is cached, a failure leaves the cache untouched.
    pub async fn fetch_one(&self, url: &str) -> Result<Document, FetchError> {
        if let Some(cache) = &self.cache {
            if let Some(document) = cache.get(url) {
                tracing::debug!("Cache hit: {}", url);
                return Ok(document);
            }
            tracing::debug!("Cache miss, fetching: {}", url);
        }

        let document = self.fetcher.fetch(url).await?;

        if let Some(cache) = &self.cache {
            cache.set(url, document.clone(), self.cache_ttl);
        }

        Ok(document)
    }

    /// Fetches a batch with the configured concurrency and no cancellation
    pub async fn fetch_all(&self, urls: &[String]) -> BatchResult {
        self.fetch_batch(urls, CancellationToken::new(), self.max_concurrency)
            .await
    }

    /// Fetches every URL concurrently, at most `max_concurrency` at a time
    ///
    /// # Behavior
    ///
    /// - One task per URL, duplicates included
    /// - A task still waiting for admission when `cancel` fires reports
    ///   `Cancelled` without fetching; admitted tasks run to completion
    /// - A failure in one task never affects another
    /// - Returns after every task has finished, with exactly one outcome per
    ///   requested URL in request order
    ///
    /// # Arguments
    ///
    /// * `urls` - The URLs to fetch
    /// * `cancel` - Token that stops tasks not yet admitted
    /// * `max_concurrency` - Number of admission permits (at least 1)
    pub async fn fetch_batch(
        &self,
        urls: &[String],
        cancel: CancellationToken,
        max_concurrency: usize,
    ) -> BatchResult {
        let started = std::time::Instant::now();
        tracing::info!(
            "Starting batch fetch of {} URLs (max concurrency {})",
            urls.len(),
            max_concurrency.max(1)
        );

        let limiter = Arc::new(Semaphore::new(max_concurrency.max(1)));
        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, FetchOutcome)>();

        let handles: Vec<_> = urls
            .iter()
            .enumerate()
            .map(|(index, url)| {
                let this = self.clone();
                let limiter = Arc::clone(&limiter);
                let cancel = cancel.clone();
                let tx = tx.clone();
                let url = url.clone();

                tokio::spawn(async move {
                    let result = this.run_unit(&url, limiter, cancel).await;
                    match &result {
                        Ok(document) => tracing::debug!(
                            "Fetched {} ({} chars)",
                            url,
                            document.content.chars().count()
                        ),
                        Err(FetchError::Cancelled { .. }) => {
                            tracing::debug!("Cancelled before admission: {}", url)
                        }
                        Err(e) => tracing::warn!("Failed to fetch {}: {}", url, e),
                    }
                    // The collector outlives every sender.
                    let _ = tx.send((index, FetchOutcome { url, result }));
                })
            })
            .collect();

        // Only the tasks hold senders now; recv returns None once all are done.
        drop(tx);

        let mut slots: Vec<Option<FetchOutcome>> = urls.iter().map(|_| None).collect();
        while let Some((index, outcome)) = rx.recv().await {
            slots[index] = Some(outcome);
        }

        let mut outcomes = Vec::with_capacity(urls.len());
        for ((slot, handle), url) in slots.into_iter().zip(handles).zip(urls) {
            let outcome = match slot {
                Some(outcome) => outcome,
                None => {
                    let message = match handle.await {
                        Err(e) => e.to_string(),
                        Ok(()) => "task finished without reporting".to_string(),
                    };
                    tracing::error!("Fetch task for {} aborted: {}", url, message);
                    FetchOutcome {
                        url: url.clone(),
                        result: Err(FetchError::Aborted {
                            url: url.clone(),
                            message,
                        }),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let result = BatchResult { outcomes };
        let succeeded = result.success_count();
        let cancelled = result
            .failures_by_kind()
            .get(&ErrorKind::Cancelled)
            .copied()
            .unwrap_or(0);
        tracing::info!(
            "Batch fetch complete in {:?}: {} total, {} succeeded, {} failed, {} cancelled, cache size {}",
            started.elapsed(),
            result.len(),
            succeeded,
            result.len() - succeeded - cancelled,
            cancelled,
            self.cache_size()
        );

        result
    }

    /// Waits for admission, then fetches; the permit drops when this returns
    async fn run_unit(
        &self,
        url: &str,
        limiter: Arc<Semaphore>,
        cancel: CancellationToken,
    ) -> Result<Document, FetchError> {
        let _permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(FetchError::Cancelled { url: url.to_string() });
            }
            permit = limiter.acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => {
                    return Err(FetchError::Aborted {
                        url: url.to_string(),
                        message: "admission limiter closed".to_string(),
                    });
                }
            },
        };

        self.fetch_one(url).await
    }
}

impl std::fmt::Debug for BatchFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchFetcher")
            .field("cache_enabled", &self.cache.is_some())
            .field("cache_ttl", &self.cache_ttl)
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}

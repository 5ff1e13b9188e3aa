//! Fetcher module for document retrieval
//!
//! This module contains the core fetching logic, including:
//! - HTML title and text extraction
//! - Single-page HTTP fetching with validation and retry
//! - Cache-first, bounded-concurrency batch orchestration

mod batch;
mod extract;
mod page;

pub use batch::{BatchFetcher, BatchResult, FetchOutcome};
pub use extract::{extract_page, ExtractedPage, MAX_CONTENT_CHARS, TRUNCATION_MARKER};
pub use page::{build_http_client, PageFetcher};

use crate::FetchError;
use async_trait::async_trait;

/// A fetched page reduced to its title and plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The URL the document was requested from
    pub url: String,

    /// Resolved page title, possibly empty
    pub title: String,

    /// Extracted body text, never empty
    pub content: String,
}

/// Source of documents for the batch fetcher
///
/// [`PageFetcher`] is the network implementation; tests substitute doubles.
#[async_trait]
pub trait PageFetch: Send + Sync {
    /// Retrieves one document, performing any retries internally
    async fn fetch(&self, url: &str) -> Result<Document, FetchError>;
}

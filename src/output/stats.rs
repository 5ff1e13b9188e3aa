//! Statistics for a finished batch
//!
//! This module reduces a [`BatchResult`] to counts and failure reasons and
//! prints them for the command-line report.

use crate::fetcher::BatchResult;
use crate::ErrorKind;
use std::collections::BTreeMap;

/// Batch statistics summary
#[derive(Debug, Clone, Default)]
pub struct BatchStatistics {
    /// Number of URLs requested
    pub total: usize,

    /// Number of documents fetched
    pub succeeded: usize,

    /// Failed outcomes by error kind (cancellations included)
    pub failures_by_kind: BTreeMap<ErrorKind, usize>,

    /// Failed URLs and their error messages, in request order
    pub failures: Vec<(String, String)>,

    /// Total characters of extracted content
    pub content_chars: usize,
}

impl BatchStatistics {
    /// Builds statistics from a batch result
    pub fn from_result(result: &BatchResult) -> Self {
        let mut content_chars = 0;
        let mut failures = Vec::new();

        for outcome in result {
            match &outcome.result {
                Ok(document) => content_chars += document.content.chars().count(),
                Err(e) => failures.push((outcome.url.clone(), e.to_string())),
            }
        }

        Self {
            total: result.len(),
            succeeded: result.success_count(),
            failures_by_kind: result.failures_by_kind(),
            failures,
            content_chars,
        }
    }

    /// Number of outcomes cancelled before admission
    pub fn cancelled(&self) -> usize {
        self.failures_by_kind
            .get(&ErrorKind::Cancelled)
            .copied()
            .unwrap_or(0)
    }

    /// Number of outcomes that failed for reasons other than cancellation
    pub fn failed(&self) -> usize {
        self.total - self.succeeded - self.cancelled()
    }

    /// Percentage of requested URLs that produced a document
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.succeeded as f64 / self.total as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
/// * `cache_size` - Number of cached documents after the batch
pub fn print_statistics(stats: &BatchStatistics, cache_size: usize) {
    println!("=== Fetch Summary ===\n");

    println!("Overview:");
    println!("  URLs requested: {}", stats.total);
    println!("  Succeeded: {}", stats.succeeded);
    println!("  Failed: {}", stats.failed());
    println!("  Cancelled: {}", stats.cancelled());
    println!("  Content extracted: {} chars", stats.content_chars);
    println!("  Cached documents: {}", cache_size);
    println!();

    if !stats.failures_by_kind.is_empty() {
        println!("Failures by Kind:");
        for (kind, count) in &stats.failures_by_kind {
            println!("  {:?}: {}", kind, count);
        }
        println!();
    }

    if !stats.failures.is_empty() {
        println!("Failed URLs ({}):", stats.failures.len());
        for (url, message) in &stats.failures {
            println!("  - {}: {}", url, message);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} URLs fetched)",
        stats.success_rate(),
        stats.succeeded,
        stats.total
    );
}

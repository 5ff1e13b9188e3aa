//! Output module for batch reports
//!
//! This module handles:
//! - Summarizing a batch result into counts by outcome
//! - Printing the summary to stdout
//! - Writing a markdown report of every fetched URL

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use stats::{print_statistics, BatchStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

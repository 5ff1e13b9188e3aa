//! Krio-Fetch: a guarded, cached, bounded-concurrency page fetcher
//!
//! This crate retrieves remote documents over HTTP(S) for downstream
//! summarization. It refuses private-network targets, retries transient
//! failures, caches recent documents for a fixed TTL, and fans batches of URLs
//! out to independent tasks under a global concurrency cap.

pub mod cache;
pub mod config;
pub mod fetcher;
pub mod input;
pub mod output;
pub mod url;

use thiserror::Error;

/// Error produced while fetching a single URL
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("URL validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Network error for {url} after {attempts} attempt(s): {message}")]
    Network {
        url: String,
        attempts: u32,
        message: String,
    },

    #[error("No content extracted from {url} after {attempts} attempt(s)")]
    EmptyContent { url: String, attempts: u32 },

    #[error("Fetch of {url} cancelled before admission")]
    Cancelled { url: String },

    #[error("Fetch task for {url} aborted: {message}")]
    Aborted { url: String, message: String },
}

/// Coarse classification of a [`FetchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    Validation,
    Network,
    EmptyContent,
    Cancelled,
    Aborted,
}

impl FetchError {
    /// Returns the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Network { .. } => ErrorKind::Network,
            Self::EmptyContent { .. } => ErrorKind::EmptyContent,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::Aborted { .. } => ErrorKind::Aborted,
        }
    }

    /// Number of fetch attempts made, for errors raised by the retry loop
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::Network { attempts, .. } | Self::EmptyContent { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}

/// URL validation errors raised by the SSRF guard
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Failed to parse URL '{url}': {reason}")]
    Malformed { url: String, reason: String },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),

    #[error("Private or loopback address not allowed: {0}")]
    PrivateAddress(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while reading URL list files
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read URL list: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use crate::cache::TtlCache;
pub use crate::config::Config;
pub use crate::fetcher::{BatchFetcher, BatchResult, Document, FetchOutcome, PageFetch, PageFetcher};
pub use crate::url::{validate_url, UrlGuard};

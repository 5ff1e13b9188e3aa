//! URL handling module for Krio-Fetch
//!
//! This module provides the pre-flight guard that every fetch attempt runs
//! before touching the network: parse checks, scheme checks, and a
//! private-address (SSRF) filter.

mod guard;

pub use guard::{is_private_host, UrlGuard, PRIVATE_HOST_PREFIXES};

use crate::ValidationError;

/// Validates a URL with the default guard (no trusted hosts)
///
/// # Arguments
///
/// * `url` - The URL string to validate
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL, safe to fetch
/// * `Err(ValidationError)` - The URL is malformed, not HTTP(S), or private
///
/// # Examples
///
/// ```
/// use krio_fetch::url::validate_url;
///
/// assert!(validate_url("https://example.com").is_ok());
/// assert!(validate_url("http://192.168.1.1").is_err());
/// ```
pub fn validate_url(url: &str) -> Result<::url::Url, ValidationError> {
    UrlGuard::default().validate(url)
}

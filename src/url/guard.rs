//! SSRF guard for outbound fetches
//!
//! The private-address check is a literal comparison on the host string:
//! `localhost`, `127.0.0.1`, and the IPv4 prefixes in
//! [`PRIVATE_HOST_PREFIXES`]. The comparison runs on the host as the `url`
//! crate parsed it, and WHATWG host parsing lowercases names and rewrites
//! IPv4 written in decimal, octal, hex, or shortened form into dotted quads.
//! So `http://LOCALHOST/`, `http://2130706433/`, `http://0x7f.0.0.1/` and
//! `http://127.1/` are all blocked as `127.0.0.1`/`localhost`.
//!
//! It performs no DNS resolution and does not cover IPv6 loopback/ULA ranges
//! or the rest of `127.0.0.0/8`. A hostname that resolves to a private
//! address passes.

use crate::ValidationError;
use std::collections::HashSet;
use url::Url;

/// Host prefixes treated as private network targets
pub const PRIVATE_HOST_PREFIXES: &[&str] = &[
    "10.", "172.16.", "172.17.", "172.18.", "172.19.", "172.20.", "172.21.", "172.22.",
    "172.23.", "172.24.", "172.25.", "172.26.", "172.27.", "172.28.", "172.29.", "172.30.",
    "172.31.", "192.168.",
];

/// Returns true if the host string names a loopback or private target
pub fn is_private_host(host: &str) -> bool {
    if host == "localhost" || host == "127.0.0.1" {
        return true;
    }

    PRIVATE_HOST_PREFIXES
        .iter()
        .any(|prefix| host.starts_with(prefix))
}

/// Pre-flight URL validator
///
/// The default guard applies every check. Hosts added with
/// [`UrlGuard::with_trusted_hosts`] skip only the private-address check;
/// parse and scheme checks always apply.
#[derive(Debug, Clone, Default)]
pub struct UrlGuard {
    trusted_hosts: HashSet<String>,
}

impl UrlGuard {
    /// Creates a guard with no trusted hosts
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a guard that lets the given hosts through the private-address check
    pub fn with_trusted_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            trusted_hosts: hosts
                .into_iter()
                .map(|h| h.into().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Returns true if the host was explicitly trusted
    pub fn is_trusted(&self, host: &str) -> bool {
        self.trusted_hosts.contains(host)
    }

    /// Validates a URL string for fetching
    ///
    /// # Validation Rules
    ///
    /// | Check | Failure |
    /// |-------|---------|
    /// | Parses as an absolute URL | `Malformed` |
    /// | Scheme is `http` or `https` | `UnsupportedScheme` |
    /// | Has a host | `MissingHost` |
    /// | Host is not loopback/private (unless trusted) | `PrivateAddress` |
    ///
    /// # Arguments
    ///
    /// * `url` - The URL string to check
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - The parsed URL
    /// * `Err(ValidationError)` - The first failed check
    pub fn validate(&self, url: &str) -> Result<Url, ValidationError> {
        let parsed = Url::parse(url).map_err(|e| ValidationError::Malformed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(ValidationError::UnsupportedScheme(other.to_string())),
        }

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ValidationError::MissingHost(url.to_string()))?;

        if is_private_host(host) && !self.is_trusted(host) {
            return Err(ValidationError::PrivateAddress(url.to_string()));
        }

        Ok(parsed)
    }
}

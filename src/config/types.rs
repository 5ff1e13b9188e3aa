use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Krio-Fetch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Single-page retrieval configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Timeout for one request attempt (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Retries after the first failed attempt
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Fixed delay between attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Hosts exempt from the private-address check
    #[serde(rename = "trusted-hosts")]
    pub trusted_hosts: Vec<String>,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; krio-fetch/0.1)".to_string(),
            timeout_secs: 15,
            max_retries: 3,
            retry_delay_ms: 1000,
            trusted_hosts: Vec::new(),
        }
    }
}

/// Document cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether fetched documents are cached
    pub enabled: bool,

    /// Lifetime of a cached document (seconds)
    #[serde(rename = "ttl-secs")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 3600,
        }
    }
}

/// Batch orchestration configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of URLs fetched at once
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_concurrency: 5 }
    }
}

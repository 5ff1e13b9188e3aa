use crate::config::types::{BatchConfig, CacheConfig, Config, FetcherConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_cache_config(&config.cache)?;
    validate_batch_config(&config.batch)?;
    Ok(())
}

/// Validates single-page retrieval configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.retry_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "retry_delay_ms must be <= 60000ms, got {}ms",
            config.retry_delay_ms
        )));
    }

    for host in &config.trusted_hosts {
        validate_host(host)?;
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.enabled && config.ttl_secs < 1 {
        return Err(ConfigError::Validation(
            "ttl_secs must be >= 1 when the cache is enabled".to_string(),
        ));
    }

    Ok(())
}

/// Validates batch configuration
fn validate_batch_config(config: &BatchConfig) -> Result<(), ConfigError> {
    if config.max_concurrency < 1 || config.max_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and 100, got {}",
            config.max_concurrency
        )));
    }

    Ok(())
}

/// Validates a trusted host entry (bare host, no scheme, port, or path)
fn validate_host(host: &str) -> Result<(), ConfigError> {
    if host.is_empty() {
        return Err(ConfigError::Validation(
            "trusted host cannot be empty".to_string(),
        ));
    }

    if host.contains("://") || host.contains('/') || host.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "trusted host '{}' must be a bare host name or IP address",
            host
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let mut config = Config::default();
        config.fetcher.timeout_secs = 0;
        assert!(validate(&config).is_err());

        config.fetcher.timeout_secs = 301;
        assert!(validate(&config).is_err());

        config.fetcher.timeout_secs = 300;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_retries() {
        let mut config = Config::default();
        config.fetcher.max_retries = 0;
        assert!(validate(&config).is_ok());

        config.fetcher.max_retries = 11;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let mut config = Config::default();
        config.fetcher.user_agent = "   ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_cache_ttl() {
        let mut config = Config::default();
        config.cache.ttl_secs = 0;
        assert!(validate(&config).is_err());

        // TTL is irrelevant when the cache is off
        config.cache.enabled = false;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_max_concurrency() {
        let mut config = Config::default();
        config.batch.max_concurrency = 0;
        assert!(validate(&config).is_err());

        config.batch.max_concurrency = 101;
        assert!(validate(&config).is_err());

        config.batch.max_concurrency = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_host() {
        assert!(validate_host("127.0.0.1").is_ok());
        assert!(validate_host("intranet.example.com").is_ok());

        assert!(validate_host("").is_err());
        assert!(validate_host("http://example.com").is_err());
        assert!(validate_host("example.com/path").is_err());
        assert!(validate_host("bad host").is_err());
    }
}

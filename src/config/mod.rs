//! Configuration module for Krio-Fetch
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a missing section falls back to built-in values.
//!
//! # Example
//!
//! ```no_run
//! use krio_fetch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("krio.toml")).unwrap();
//! println!("Fetching at most {} pages at once", config.batch.max_concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BatchConfig, CacheConfig, Config, FetcherConfig};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;

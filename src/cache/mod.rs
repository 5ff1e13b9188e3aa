//! Document caching module
//!
//! This module provides an in-memory, time-bounded cache of fetched documents
//! keyed by URL. Entries expire lazily: an expired entry is ignored on read
//! and only leaves storage when overwritten, purged, or cleared.

mod ttl;

pub use ttl::TtlCache;

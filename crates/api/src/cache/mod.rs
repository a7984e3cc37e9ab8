pub mod ttl_cache;

pub use ttl_cache::{CacheStats, TtlCache};

use crate::services::search::SearchResult;

/// Process-local cache of restaurant search pages, keyed by the canonical filter key.
pub type SearchCache = TtlCache<SearchResult>;

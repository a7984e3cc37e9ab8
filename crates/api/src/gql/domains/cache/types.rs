use async_graphql::SimpleObject;

use crate::cache::CacheStats;

#[derive(SimpleObject, Clone, Debug)]
pub struct SearchCacheStats {
    /// Entries that would be served right now.
    pub live_entries: i32,
    /// Entries held in memory, including expired ones not yet evicted.
    pub stored_entries: i32,
    pub ttl_seconds: i32,
    pub hits: i64,
    pub misses: i64,
}

impl From<CacheStats> for SearchCacheStats {
    fn from(stats: CacheStats) -> Self {
        Self {
            live_entries: stats.live_entries as i32,
            stored_entries: stats.stored_entries as i32,
            ttl_seconds: stats.ttl_seconds as i32,
            hits: stats.hits as i64,
            misses: stats.misses as i64,
        }
    }
}

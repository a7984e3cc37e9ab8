use async_graphql::{Context, Object, Result};
use tracing::info;

use super::types::SearchCacheStats;
use crate::state::AppState;

#[derive(Default)]
pub struct CacheQuery;

#[Object]
impl CacheQuery {
    async fn search_cache_stats(&self, ctx: &Context<'_>) -> Result<SearchCacheStats> {
        let state = ctx.data::<AppState>()?;
        Ok(state.search().cache_stats().into())
    }
}

#[derive(Default)]
pub struct CacheMutation;

#[Object]
impl CacheMutation {
    /// Drop every cached search result. Returns the number of entries removed.
    async fn clear_search_cache(&self, ctx: &Context<'_>) -> Result<i32> {
        let state = ctx.data::<AppState>()?;
        let removed = state.search().clear_cache();
        info!("Search cache cleared ({} entries)", removed);
        Ok(removed as i32)
    }
}

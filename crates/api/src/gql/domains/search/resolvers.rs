use async_graphql::{Context, Object, Result};

use super::types::{RestaurantSearchPage, SearchFiltersInput};
use crate::gql::error::GqlError;
use crate::state::AppState;

#[derive(Default)]
pub struct SearchQuery;

#[Object]
impl SearchQuery {
    /// Search open restaurants. Identical searches within the cache TTL are
    /// answered from memory.
    async fn restaurants(
        &self,
        ctx: &Context<'_>,
        filters: Option<SearchFiltersInput>,
    ) -> Result<RestaurantSearchPage> {
        let state = ctx.data::<AppState>()?;
        let result = state
            .search()
            .search(filters.unwrap_or_default().into())
            .await
            .map_err(GqlError::from)?;
        Ok(RestaurantSearchPage::from(result.as_ref()))
    }
}

use async_graphql::{InputObject, SimpleObject};
use chrono::{NaiveDate, NaiveTime};

use crate::gql::domains::restaurants::types::Restaurant;
use crate::services::search::{NormalizedFilters, SearchFilters, SearchResult};

#[derive(InputObject, Clone, Debug, Default)]
pub struct SearchFiltersInput {
    /// Matches area or place, case-insensitive substring.
    pub area: Option<String>,
    /// Matches the restaurant genre, case-insensitive substring.
    pub cuisine: Option<String>,
    /// One of `$`..`$$$$`; `all` or anything else means no budget filter.
    pub budget: Option<String>,
    pub min_people: Option<i32>,
    /// Only restaurants open on this date's weekday.
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    /// `rating` (default), `name`, `created_at` or `capacity`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub sort_dir: Option<String>,
    pub page: Option<i32>,
    pub limit: Option<i32>,
}

impl From<SearchFiltersInput> for SearchFilters {
    fn from(input: SearchFiltersInput) -> Self {
        Self {
            area: input.area,
            cuisine: input.cuisine,
            budget: input.budget,
            min_people: input.min_people,
            date: input.date,
            time: input.time,
            sort_by: input.sort_by,
            sort_dir: input.sort_dir,
            page: input.page.map(i64::from),
            limit: input.limit.map(i64::from),
        }
    }
}

/// The filters as the server applied them, after defaults and clamping.
#[derive(SimpleObject, Clone, Debug)]
pub struct AppliedFilters {
    pub area: Option<String>,
    pub cuisine: Option<String>,
    pub budget: Option<String>,
    pub min_people: Option<i32>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub sort_by: String,
    pub sort_dir: String,
    pub page: i32,
    pub limit: i32,
}

impl From<&NormalizedFilters> for AppliedFilters {
    fn from(f: &NormalizedFilters) -> Self {
        Self {
            area: f.area.clone(),
            cuisine: f.cuisine.clone(),
            budget: f.budget.clone(),
            min_people: f.min_people,
            date: f.date,
            time: f.time.map(|t| t.format("%H:%M").to_string()),
            sort_by: f.sort_by.as_str().to_string(),
            sort_dir: f.sort_dir.as_str().to_string(),
            page: f.page as i32,
            limit: f.limit as i32,
        }
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct RestaurantSearchPage {
    pub restaurants: Vec<Restaurant>,
    pub total: i64,
    pub page: i32,
    pub limit: i32,
    pub total_pages: i32,
    pub filters: AppliedFilters,
}

impl From<&SearchResult> for RestaurantSearchPage {
    fn from(result: &SearchResult) -> Self {
        Self {
            restaurants: result
                .restaurants
                .iter()
                .cloned()
                .map(Restaurant::from)
                .collect(),
            total: result.total,
            page: result.page as i32,
            limit: result.limit as i32,
            total_pages: result.total_pages as i32,
            filters: AppliedFilters::from(&result.filters),
        }
    }
}

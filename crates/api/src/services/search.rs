use std::future::Future;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::cache::{CacheStats, SearchCache};
use infra::db::Db;
use infra::models::RestaurantListingRow;
use infra::pagination::LimitOffset;
use infra::repos::{restaurants, RestaurantSearch, RestaurantSort, SortDirection};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

const BUDGETS: [&str; 4] = ["$", "$$", "$$$", "$$$$"];

/// Search input as the client sent it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    pub area: Option<String>,
    pub cuisine: Option<String>,
    pub budget: Option<String>,
    pub min_people: Option<i32>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Rating,
    Name,
    CreatedAt,
    Capacity,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Rating => "rating",
            SortField::Name => "name",
            SortField::CreatedAt => "created_at",
            SortField::Capacity => "capacity",
        }
    }

    /// Unknown names fall back to the default ordering.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "rating" => SortField::Rating,
            "name" => SortField::Name,
            "created_at" | "createdat" => SortField::CreatedAt,
            "capacity" => SortField::Capacity,
            _ => SortField::default(),
        }
    }
}

impl From<SortField> for RestaurantSort {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Rating => RestaurantSort::Rating,
            SortField::Name => RestaurantSort::Name,
            SortField::CreatedAt => RestaurantSort::CreatedAt,
            SortField::Capacity => RestaurantSort::Capacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            _ => SortOrder::default(),
        }
    }
}

impl From<SortOrder> for SortDirection {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => SortDirection::Asc,
            SortOrder::Desc => SortDirection::Desc,
        }
    }
}

/// Filters after defaults and clamping. Two requests that mean the same
/// search normalize to equal values and therefore to the same cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedFilters {
    pub area: Option<String>,
    pub cuisine: Option<String>,
    pub budget: Option<String>,
    pub min_people: Option<i32>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub sort_by: SortField,
    pub sort_dir: SortOrder,
    pub page: i64,
    pub limit: i64,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SearchFilters {
    pub fn normalize(self) -> NormalizedFilters {
        let budget = non_empty(self.budget).filter(|b| BUDGETS.contains(&b.as_str()));

        let limit = match self.limit {
            Some(l) if l > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
            Some(l) if l > 0 => l,
            _ => DEFAULT_PAGE_SIZE,
        };

        NormalizedFilters {
            area: non_empty(self.area),
            cuisine: non_empty(self.cuisine),
            budget,
            min_people: self.min_people.filter(|n| *n > 0),
            date: self.date,
            // Minute precision is all a booking time carries.
            time: self
                .time
                .and_then(|t| t.with_second(0))
                .and_then(|t| t.with_nanosecond(0)),
            sort_by: self
                .sort_by
                .as_deref()
                .map(SortField::parse_or_default)
                .unwrap_or_default(),
            sort_dir: self
                .sort_dir
                .as_deref()
                .map(SortOrder::parse_or_default)
                .unwrap_or_default(),
            page: self.page.filter(|p| *p >= 1).unwrap_or(1),
            limit,
        }
    }
}

impl NormalizedFilters {
    /// `"search:"` followed by the filters as JSON with a fixed field set.
    /// Absent filters are written as `null`, so omitting a field and sending
    /// its default produce the same key.
    pub fn cache_key(&self) -> String {
        let value = json!({
            "area": self.area,
            "cuisine": self.cuisine,
            "budget": self.budget,
            "min_people": self.min_people,
            "date": self.date.map(|d| d.format("%Y-%m-%d").to_string()),
            "time": self.time.map(|t| t.format("%H:%M").to_string()),
            "sort_by": self.sort_by,
            "sort_dir": self.sort_dir,
            "page": self.page,
            "limit": self.limit,
        });
        format!("search:{value}")
    }

    pub fn to_search(&self) -> RestaurantSearch {
        RestaurantSearch {
            area: self.area.clone(),
            cuisine: self.cuisine.clone(),
            budget: self.budget.clone(),
            min_people: self.min_people,
            open_on_weekday: self
                .date
                .map(|d| d.weekday().num_days_from_sunday() as i32),
            sort: self.sort_by.into(),
            direction: self.sort_dir.into(),
        }
    }

    pub fn page_window(&self) -> LimitOffset {
        LimitOffset::from_page(self.page, self.limit)
    }
}

/// One page of search results. Built once, then shared read-only.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub restaurants: Vec<RestaurantListingRow>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub filters: NormalizedFilters,
}

impl SearchResult {
    pub fn new(restaurants: Vec<RestaurantListingRow>, total: i64, filters: NormalizedFilters) -> Self {
        let total_pages = if total <= 0 {
            0
        } else {
            (total + filters.limit - 1) / filters.limit
        };
        Self {
            restaurants,
            total,
            page: filters.page,
            limit: filters.limit,
            total_pages,
            filters,
        }
    }
}

/// Where search results come from on a cache miss.
pub trait SearchBackend: Send + Sync {
    fn run(
        &self,
        filters: &NormalizedFilters,
    ) -> impl Future<Output = Result<SearchResult, sqlx::Error>> + Send;
}

#[derive(Clone)]
pub struct PgSearchBackend {
    pool: Db,
}

impl PgSearchBackend {
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }
}

impl SearchBackend for PgSearchBackend {
    fn run(
        &self,
        filters: &NormalizedFilters,
    ) -> impl Future<Output = Result<SearchResult, sqlx::Error>> + Send {
        let pool = self.pool.clone();
        let filters = filters.clone();

        async move {
            let search = filters.to_search();
            let (rows, total) = tokio::try_join!(
                restaurants::search(&pool, &search, filters.page_window()),
                restaurants::count(&pool, &search)
            )?;
            Ok(SearchResult::new(rows, total, filters))
        }
    }
}

/// Restaurant search with a read-through TTL cache in front of the backend.
pub struct SearchService<B> {
    backend: B,
    cache: Arc<SearchCache>,
}

impl<B: Clone> Clone for SearchService<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<B: SearchBackend> SearchService<B> {
    pub fn new(backend: B, cache: Arc<SearchCache>) -> Self {
        Self { backend, cache }
    }

    pub async fn search(&self, filters: SearchFilters) -> Result<Arc<SearchResult>, sqlx::Error> {
        let filters = filters.normalize();
        let key = filters.cache_key();

        if let Some(hit) = self.cache.get(&key) {
            debug!("Search cache hit for {}", key);
            return Ok(hit);
        }
        debug!("Search cache miss for {}", key);

        // Failed lookups are returned as-is and never stored.
        let result = Arc::new(self.backend.run(&filters).await?);
        self.cache.put(key, Arc::clone(&result));
        Ok(result)
    }

    pub fn cache(&self) -> &Arc<SearchCache> {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) -> usize {
        self.cache.clear()
    }
}

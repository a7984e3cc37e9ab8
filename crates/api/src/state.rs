use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::SearchCache;
use crate::config::AppConfig;
use crate::services::{PgSearchBackend, SearchService};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    config: Arc<AppConfig>,
    search: SearchService<PgSearchBackend>,
}

impl AppState {
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let cache = Arc::new(SearchCache::new(config.search_cache_ttl));
        let search = SearchService::new(PgSearchBackend::new(db.clone()), cache);

        Self {
            db,
            config: Arc::new(config),
            search,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn search(&self) -> &SearchService<PgSearchBackend> {
        &self.search
    }
}

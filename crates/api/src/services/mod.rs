pub mod cache_sweeper;
pub mod reservations;
pub mod search;

pub use cache_sweeper::{spawn_cache_sweeper, CacheSweeper};
pub use search::{PgSearchBackend, SearchBackend, SearchFilters, SearchResult, SearchService};

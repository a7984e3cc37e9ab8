use std::sync::Arc;

use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::SearchCache;
use crate::AppState;

/// Periodically evicts expired search results so entries nobody asks for
/// again don't sit in memory until the next lookup of the same key.
pub struct CacheSweeper {
    cache: Arc<SearchCache>,
    interval: Interval,
}

impl CacheSweeper {
    pub fn new(state: &AppState) -> Self {
        let mut interval = interval(state.config().cache_sweep_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            cache: Arc::clone(state.search().cache()),
            interval,
        }
    }

    pub async fn run(&mut self) {
        info!(
            "Starting search cache sweeper (every {:?})",
            self.interval.period()
        );

        loop {
            self.interval.tick().await;
            self.sweep();
        }
    }

    pub fn sweep(&self) -> usize {
        let removed = self.cache.purge_expired();
        if removed > 0 {
            debug!("Evicted {} expired search cache entries", removed);
        }
        removed
    }
}

pub fn spawn_cache_sweeper(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut sweeper = CacheSweeper::new(&state);
        sweeper.run().await;
    })
}

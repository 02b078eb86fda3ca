use std::{fmt, sync::Arc};

use cinesearch_core::CatalogClient;

use super::cache::GenreCache;
use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<CatalogClient>,
    pub genre_cache: Arc<GenreCache>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(client: CatalogClient, config: Config) -> Self {
        Self {
            client: Arc::new(client),
            genre_cache: Arc::new(GenreCache::new(config.cache.genre_ttl)),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

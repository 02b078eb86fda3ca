use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use cinesearch_core::{CatalogError, Genre};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug)]
struct CachedGenres {
    fetched_at: Instant,
    genres: Arc<Vec<Genre>>,
}

#[derive(Debug, Default)]
struct CacheSlot {
    cached: Option<CachedGenres>,
    last_failure: Option<Arc<CatalogError>>,
}

/// Keeps the last successful genre listing for `ttl`.
///
/// Requests that queue behind an upstream fetch share its outcome: a
/// failure is handed to every caller that was already waiting, then
/// forgotten, so the next request goes upstream again. A zero TTL turns the
/// cache off.
#[derive(Debug)]
pub struct GenreCache {
    ttl: Duration,
    slot: RwLock<CacheSlot>,
    /// Upstream fetches finished so far; written under the slot's write lock.
    completed: AtomicU64,
}

impl GenreCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(CacheSlot::default()),
            completed: AtomicU64::new(0),
        }
    }

    pub async fn get_or_fetch<F, Fut>(
        &self,
        fetch: F,
    ) -> Result<Arc<Vec<Genre>>, Arc<CatalogError>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Genre>, CatalogError>>,
    {
        if self.ttl.is_zero() {
            return fetch().await.map(Arc::new).map_err(Arc::new);
        }

        let arrived_after = self.completed.load(Ordering::Acquire);

        if let Some(genres) = self.fresh(self.slot.read().await.cached.as_ref()) {
            debug!("serving genres from cache");
            return Ok(genres);
        }

        let mut slot = self.slot.write().await;
        // Filled by a concurrent request while waiting for the lock.
        if let Some(genres) = self.fresh(slot.cached.as_ref()) {
            return Ok(genres);
        }
        if self.completed.load(Ordering::Acquire) > arrived_after {
            if let Some(err) = &slot.last_failure {
                debug!("sharing the genre fetch failure seen while waiting");
                return Err(Arc::clone(err));
            }
        }

        let outcome = fetch().await;
        self.completed.fetch_add(1, Ordering::Release);
        match outcome {
            Ok(genres) => {
                let genres = Arc::new(genres);
                slot.cached = Some(CachedGenres {
                    fetched_at: Instant::now(),
                    genres: Arc::clone(&genres),
                });
                slot.last_failure = None;
                info!(count = genres.len(), ttl = ?self.ttl, "genre cache refreshed");
                Ok(genres)
            }
            Err(err) => {
                let err = Arc::new(err);
                warn!(error = %err, "genre fetch failed");
                slot.last_failure = Some(Arc::clone(&err));
                Err(err)
            }
        }
    }

    fn fresh(&self, cached: Option<&CachedGenres>) -> Option<Arc<Vec<Genre>>> {
        cached
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.genres))
    }
}

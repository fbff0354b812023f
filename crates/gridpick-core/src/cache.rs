// Single-entry read-through cache with a fixed time-to-live.

use std::future::Future;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::error::Result;

struct Entry<T> {
    value: T,
    stored_at: Instant,
}

/// Holds the last successful fetch for `ttl`.
///
/// Failed fetches are never stored. Concurrent misses each call the fetcher;
/// the last one to finish wins.
pub struct TtlCache<T> {
    label: &'static str,
    ttl: Duration,
    entry: RwLock<Option<Entry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(label: &'static str, ttl: Duration) -> Self {
        TtlCache {
            label,
            ttl,
            entry: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached value, if one exists and has not expired.
    pub async fn get(&self) -> Option<T> {
        let guard = self.entry.read().await;
        guard
            .as_ref()
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }

    /// Return the cached value or call `fetch` and store its result.
    ///
    /// `force_refresh` skips the lookup but still stores a successful fetch.
    pub async fn get_or_fetch<F, Fut>(&self, force_refresh: bool, fetch: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !force_refresh {
            if let Some(value) = self.get().await {
                debug!("{} cache hit", self.label);
                return Ok(value);
            }
        }

        debug!(
            "{} cache {}; fetching",
            self.label,
            if force_refresh { "bypassed" } else { "miss" }
        );
        let value = fetch().await?;
        *self.entry.write().await = Some(Entry {
            value: value.clone(),
            stored_at: Instant::now(),
        });
        Ok(value)
    }

    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }
}

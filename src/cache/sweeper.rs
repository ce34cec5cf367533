//! Background eviction of expired cache entries.

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::cache::RenderedCache;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Handle to the task that sweeps a [`RenderedCache`] once per TTL.
///
/// The task clears the whole cache exactly once on its way out. Dropping the
/// handle stops it as well.
pub struct CacheSweeper {
    shutdown: Shutdown,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl CacheSweeper {
    /// Spawn the sweep loop on the current tokio runtime.
    pub fn spawn(cache: RenderedCache) -> Self {
        let shutdown = Shutdown::new();
        let task = tokio::spawn(run(cache, shutdown.subscribe()));

        Self {
            shutdown,
            task: Mutex::new(Some(task)),
        }
    }

    /// Stop the loop and wait until the final clear has happened.
    ///
    /// Idempotent: later (or concurrent) callers return once the first stop
    /// has completed.
    pub async fn stop(&self) {
        let mut task = self.task.lock().await;

        if let Some(handle) = task.take() {
            self.shutdown.trigger();
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Cache sweeper task failed");
            }
        }
    }

    pub async fn is_running(&self) -> bool {
        self.task.lock().await.is_some()
    }
}

async fn run(cache: RenderedCache, mut shutdown: broadcast::Receiver<()>) {
    let period = cache.ttl();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::debug!(ttl = ?period, "Cache sweeper started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = cache.clear_expired();
                if removed > 0 {
                    tracing::trace!(removed, remaining = cache.len(), "Expired pages evicted");
                }
                metrics::record_cache_size(cache.len());
            }
            _ = shutdown.recv() => break,
        }
    }

    cache.clear();
    metrics::record_cache_size(0);
    tracing::debug!("Cache sweeper stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderProperties;
    use std::time::Duration;

    fn props(code: u16) -> RenderProperties {
        RenderProperties::new(code, "m", "d")
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeps_expired_entries() {
        let cache = RenderedCache::new(Duration::from_millis(100));
        let sweeper = CacheSweeper::spawn(cache.clone());

        cache.put("tpl", &props(404), "old");
        time::sleep(Duration::from_millis(150)).await;
        cache.put("tpl", &props(500), "fresh");

        // First tick at 100ms removed the old entry; the fresh one expires at 250ms
        time::sleep(Duration::from_millis(60)).await;
        assert_eq!(cache.len(), 1);
        assert!(cache.get("tpl", &props(500)).is_some());

        // Tick at 300ms removes it too
        time::sleep(Duration::from_millis(100)).await;
        assert!(cache.is_empty());

        sweeper.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_clears_and_is_idempotent() {
        let cache = RenderedCache::new(Duration::from_secs(60));
        let sweeper = CacheSweeper::spawn(cache.clone());
        cache.put("tpl", &props(404), "page");
        assert!(sweeper.is_running().await);

        sweeper.stop().await;
        assert!(cache.is_empty());
        assert!(!sweeper.is_running().await);

        // A second stop neither blocks nor clears again
        cache.put("tpl", &props(404), "page");
        sweeper.stop().await;
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_stops() {
        let cache = RenderedCache::new(Duration::from_secs(60));
        let sweeper = std::sync::Arc::new(CacheSweeper::spawn(cache.clone()));
        cache.put("tpl", &props(502), "page");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sweeper = sweeper.clone();
                let cache = cache.clone();
                tokio::spawn(async move {
                    sweeper.stop().await;
                    // Every caller returns after the final clear
                    assert!(cache.get("tpl", &props(502)).is_none());
                })
            })
            .collect();
        for h in handles {
            h.await.unwrap();
        }
    }
}

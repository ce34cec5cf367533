//! Shutdown coordination.

use tokio::sync::broadcast;

/// Broadcasts a single stop request to every long-running task.
///
/// Receivers also observe the sender being dropped, so a task never outlives
/// the `Shutdown` that spawned it.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. Safe to call any number of times.
    pub fn trigger(&self) {
        let notified = self.tx.send(()).unwrap_or(0);
        tracing::debug!(subscribers = notified, "Shutdown triggered");
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once the receiver sees a trigger or the sender goes away.
pub async fn wait(mut rx: broadcast::Receiver<()>) {
    // Lagged, closed or an actual value all mean "stop".
    let _ = rx.recv().await;
}

//! Shutdown coordination.
//!
//! A single latch shared by the signal listener and the HTTP server. Once
//! triggered it stays triggered, so a waiter that subscribes late still
//! sees it.

use tokio::sync::watch;

/// Cloneable shutdown latch.
#[derive(Clone)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Trip the latch. Repeated calls are no-ops.
    pub fn trigger(&self) {
        self.tx.send_if_modified(|fired| !std::mem::replace(fired, true));
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once the latch has been tripped.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // Err means every sender is gone, which cannot happen while `self` lives.
        let _ = rx.wait_for(|fired| *fired).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

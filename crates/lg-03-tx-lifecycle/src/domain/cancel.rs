//! # Cancellation Signal
//!
//! A cloneable flag backed by a `watch` channel. Raising it wakes every
//! waiter; once raised it stays raised.

use std::sync::Arc;

use tokio::sync::watch;

/// Cooperative cancellation for the confirmation poll.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancellationSignal {
    /// A signal that has not been raised.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx: Arc::new(tx), rx }
    }

    /// Raises the signal.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Returns true once the signal has been raised.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when the signal is raised.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // Unreachable while `self` holds the sender.
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::new()
    }
}

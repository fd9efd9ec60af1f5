//! Change notification between a watcher and the reload coordinator.
//!
//! Built on a `tokio::sync::watch` channel carrying a change counter, so
//! signals fired while a reload is running collapse into a single pending
//! reload instead of queueing up.

use std::sync::Arc;

use tokio::sync::watch;

/// Sending half: fire [`notify`](Self::notify) whenever the rules changed.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: Arc<watch::Sender<u64>>,
}

/// Receiving half, owned by whoever reloads on change.
#[derive(Debug)]
pub struct ChangeSubscription {
    rx: watch::Receiver<u64>,
}

/// Create a connected notifier/subscription pair.
pub fn change_signal() -> (ChangeNotifier, ChangeSubscription) {
    let (tx, rx) = watch::channel(0);
    (
        ChangeNotifier { tx: Arc::new(tx) },
        ChangeSubscription { rx },
    )
}

impl ChangeNotifier {
    /// Signal that the rule source changed.
    pub fn notify(&self) {
        self.tx.send_modify(|count| *count = count.wrapping_add(1));
    }

    /// Another subscription that only sees signals fired from now on.
    pub fn subscribe(&self) -> ChangeSubscription {
        ChangeSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of signals fired so far.
    pub fn count(&self) -> u64 {
        *self.tx.borrow()
    }
}

impl ChangeSubscription {
    /// Wait for the next change.
    ///
    /// Returns `false` once every clone of the notifier has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

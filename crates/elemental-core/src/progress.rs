//! Best-effort progress events emitted while a search runs

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Snapshot of a running search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProgress {
    /// Element currently being expanded
    pub current_element: String,
    /// Frontier states visited so far
    pub visited: usize,
    /// Paths found so far in this run
    pub paths_found: usize,
    /// Elements discovered so far
    pub discovered: Vec<String>,
}

/// Optional, non-blocking progress channel.
///
/// Events are dropped when no receiver is attached or the channel is full;
/// emitting never waits on the consumer.
#[derive(Debug, Clone, Default)]
pub struct ProgressSink {
    tx: Option<mpsc::Sender<SearchProgress>>,
}

impl ProgressSink {
    /// A sink that discards everything
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn new(tx: mpsc::Sender<SearchProgress>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Create a sink and the receiver that observes it
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<SearchProgress>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Try to deliver an event. The event is only built when there is room.
    pub fn emit_with(&self, build: impl FnOnce() -> SearchProgress) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.is_closed() || tx.capacity() == 0 {
            return;
        }
        let _ = tx.try_send(build());
    }
}

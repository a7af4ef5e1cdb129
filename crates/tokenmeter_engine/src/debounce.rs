use std::sync::mpsc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::{EngineEvent, Snapshot};

/// Collapses a burst of input snapshots into a single elapsed event carrying
/// the last snapshot. Rearming cancels the pending timer, so for N arms
/// within the quiet period exactly one event fires.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or rearm) the quiet-period timer on the given runtime.
    pub fn arm(
        &mut self,
        runtime: &tokio::runtime::Handle,
        snapshot: Snapshot,
        quiet_period: Duration,
        event_tx: mpsc::Sender<EngineEvent>,
    ) {
        self.cancel();
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(quiet_period).await;
            let _ = event_tx.send(EngineEvent::QuietPeriodElapsed { snapshot });
        }));
    }

    /// Cancel any pending timer without firing it.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

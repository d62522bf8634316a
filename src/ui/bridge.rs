//! Thread boundary between the core and the UI thread.
//!
//! Core threads (the streaming loop, background workers, the controller on
//! the event thread) hold a cloneable [`UiPusher`]. The UI thread owns the
//! single [`UiBridge`] and drains mutation batches from it.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use super::UiMutation;

/// UI-side handle for receiving mutation batches.
pub struct UiBridge {
    msg_rx: Receiver<Vec<UiMutation>>,
}

/// Core-side handle for pushing mutation batches.
#[derive(Clone)]
pub struct UiPusher {
    msg_tx: Sender<Vec<UiMutation>>,
}

impl UiBridge {
    /// Create a new bridge pair: `(bridge_for_ui, pusher_for_core)`.
    pub fn new() -> (Self, UiPusher) {
        let (msg_tx, msg_rx) = unbounded();
        (Self { msg_rx }, UiPusher { msg_tx })
    }

    /// Drain all pending mutations, flattened in push order.
    pub fn drain(&self) -> Vec<UiMutation> {
        let mut mods = Vec::new();
        while let Ok(batch) = self.msg_rx.try_recv() {
            mods.extend(batch);
        }
        mods
    }

    /// Wait up to `timeout` for the next batch.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Vec<UiMutation>> {
        match self.msg_rx.recv_timeout(timeout) {
            Ok(batch) => Some(batch),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl UiPusher {
    /// Push a batch of mutations. Empty batches are not sent.
    pub fn push_mods(&self, mods: Vec<UiMutation>) {
        if mods.is_empty() {
            return;
        }
        if self.msg_tx.send(mods).is_err() {
            tracing::debug!("UI bridge closed, dropping mutations");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TabKind;

    #[test]
    fn test_drain_preserves_order() {
        let (bridge, pusher) = UiBridge::new();
        pusher.push_mods(vec![UiMutation::RedrawGraphs]);
        pusher.push_mods(vec![]);
        pusher.push_mods(vec![UiMutation::NavEnabled {
            tab: TabKind::Process,
            enabled: true,
        }]);

        let mods = bridge.drain();
        assert_eq!(mods.len(), 2);
        assert_eq!(mods[0], UiMutation::RedrawGraphs);
        assert!(bridge.drain().is_empty());
    }

    #[test]
    fn test_push_after_bridge_dropped() {
        let (bridge, pusher) = UiBridge::new();
        drop(bridge);
        // Must not panic
        pusher.push_mods(vec![UiMutation::RedrawGraphs]);
    }
}

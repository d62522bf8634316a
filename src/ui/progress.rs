//! Progress reporting for background save/load workers

use super::{UiMutation, UiPusher};
use crate::types::DialogKind;

/// Push-based sink for the progress of a long-running operation.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressSink: Send + Sync {
    /// Report progress on a 0..=100 scale
    fn progress(&self, percent: u8);

    /// Show or hide the progress indicator
    fn open(&self, open: bool);
}

/// Progress dialog that forwards to the UI bridge.
#[derive(Clone)]
pub struct ProgressDialog {
    kind: DialogKind,
    ui: UiPusher,
}

impl ProgressDialog {
    pub fn new(kind: DialogKind, ui: UiPusher) -> Self {
        Self { kind, ui }
    }

    pub fn kind(&self) -> DialogKind {
        self.kind
    }
}

impl ProgressSink for ProgressDialog {
    fn progress(&self, percent: u8) {
        self.ui.push_mods(vec![UiMutation::ProgressValue {
            dialog: self.kind,
            percent: percent.min(100),
        }]);
    }

    fn open(&self, open: bool) {
        self.ui.push_mods(vec![UiMutation::ProgressOpen {
            dialog: self.kind,
            open,
        }]);
    }
}

//! Process tab: readiness of the recording for motion processing

use crate::error::Result;
use crate::store::{keys, ChangeSet};
use crate::tab::{Tab, TabContext};
use crate::types::{TabFrame, TabKind};
use crate::ui::UiMutation;

/// Processing status shown on the tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessStatus {
    /// No recording, or too short for the background model
    #[default]
    Waiting,
    /// Recording long enough to process
    Ready,
    /// Object data has been produced
    Processed,
}

impl ProcessStatus {
    fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Waiting => "waiting",
            ProcessStatus::Ready => "ready",
            ProcessStatus::Processed => "processed",
        }
    }
}

/// Shows the first recording frame when focused and tracks whether the
/// recording can be (or has been) processed.
#[derive(Debug, Default)]
pub struct ProcessTab {
    status: ProcessStatus,
    show_first_frame: bool,
}

impl ProcessTab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ProcessStatus {
        self.status
    }

    fn refresh_status(&mut self, ctx: &TabContext<'_>) -> Vec<UiMutation> {
        let status = if ctx.store.has_obj_data() {
            ProcessStatus::Processed
        } else if ctx.store.recording_len() > ctx.config.bg_cnt_final {
            ProcessStatus::Ready
        } else {
            ProcessStatus::Waiting
        };
        if status == self.status {
            return Vec::new();
        }
        self.status = status;
        vec![UiMutation::property("process", "status", status.as_str())]
    }
}

impl Tab for ProcessTab {
    fn kind(&self) -> TabKind {
        TabKind::Process
    }

    fn reset(&mut self) -> Vec<UiMutation> {
        self.status = ProcessStatus::Waiting;
        self.show_first_frame = false;
        vec![UiMutation::property(
            "process",
            "status",
            ProcessStatus::Waiting.as_str(),
        )]
    }

    fn focus(&mut self, enter: bool, _ctx: &TabContext<'_>) -> Vec<UiMutation> {
        self.show_first_frame = enter;
        Vec::new()
    }

    fn frame(&mut self, ctx: &TabContext<'_>) -> Result<Option<TabFrame>> {
        if !self.show_first_frame {
            return Ok(None);
        }
        let frame = ctx.store.recording().and_then(|r| r.frame(0));
        if frame.is_some() {
            self.show_first_frame = false;
        }
        Ok(frame.map(TabFrame::Frame))
    }

    fn data_update(&mut self, changed: &ChangeSet, ctx: &TabContext<'_>) -> Vec<UiMutation> {
        if changed.contains(keys::RECORDING) {
            self.show_first_frame = true;
        }
        if changed.contains(keys::RECORDING) || changed.contains(keys::OBJ_DATA) {
            return self.refresh_status(ctx);
        }
        Vec::new()
    }
}

//! Camera tab: live view from the frame source

use crate::error::Result;
use crate::media::FrameSource;
use crate::store::ChangeSet;
use crate::tab::{Tab, TabContext};
use crate::types::{TabFrame, TabKind};
use crate::ui::UiMutation;

/// Live camera tab. The source only streams while the tab is focused.
pub struct CameraTab {
    source: Box<dyn FrameSource>,
    streaming: bool,
}

impl CameraTab {
    pub fn new(source: Box<dyn FrameSource>) -> Self {
        Self {
            source,
            streaming: false,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }
}

impl Tab for CameraTab {
    fn kind(&self) -> TabKind {
        TabKind::Camera
    }

    fn reset(&mut self) -> Vec<UiMutation> {
        Vec::new()
    }

    fn focus(&mut self, enter: bool, _ctx: &TabContext<'_>) -> Vec<UiMutation> {
        if enter {
            self.source.start();
        } else {
            self.source.stop();
        }
        self.streaming = enter;
        vec![UiMutation::property("camera", "streaming", enter)]
    }

    fn frame(&mut self, _ctx: &TabContext<'_>) -> Result<Option<TabFrame>> {
        if !self.streaming {
            return Ok(None);
        }
        Ok(self.source.try_frame().map(TabFrame::Frame))
    }

    fn data_update(&mut self, _changed: &ChangeSet, _ctx: &TabContext<'_>) -> Vec<UiMutation> {
        Vec::new()
    }
}

//! Capture tab: playback of the project recording

use std::time::Instant;

use crate::error::Result;
use crate::store::{keys, ChangeSet};
use crate::tab::{Tab, TabContext};
use crate::types::{TabFrame, TabKind};
use crate::ui::UiMutation;

/// Plays the recording back at the configured rate while focused. Frames
/// carry the playback period so the display keeps the timing.
#[derive(Debug, Default)]
pub struct CaptureTab {
    playhead: usize,
    playing: bool,
    focused: bool,
    last_emit: Option<Instant>,
}

impl CaptureTab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playhead(&self) -> usize {
        self.playhead
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Tab for CaptureTab {
    fn kind(&self) -> TabKind {
        TabKind::Capture
    }

    fn reset(&mut self) -> Vec<UiMutation> {
        self.playhead = 0;
        self.playing = false;
        self.last_emit = None;
        vec![
            UiMutation::property("capture", "playhead", 0),
            UiMutation::property("capture", "frame_count", 0),
        ]
    }

    fn focus(&mut self, enter: bool, ctx: &TabContext<'_>) -> Vec<UiMutation> {
        self.focused = enter;
        self.playing = enter && ctx.store.recording_len() > 0;
        self.last_emit = None;
        Vec::new()
    }

    fn frame(&mut self, ctx: &TabContext<'_>) -> Result<Option<TabFrame>> {
        if !self.playing {
            return Ok(None);
        }
        let Some(recording) = ctx.store.recording() else {
            return Ok(None);
        };

        let period = ctx.config.play_period();
        let now = Instant::now();
        if self.last_emit.is_some_and(|last| now.duration_since(last) < period) {
            return Ok(None);
        }

        let len = recording.len();
        if len == 0 {
            return Ok(None);
        }
        if self.playhead >= len {
            self.playhead = 0;
        }
        let frame = recording.frame(self.playhead);
        self.playhead += 1;
        self.last_emit = Some(now);
        Ok(frame.map(|frame| TabFrame::Timed { frame, period }))
    }

    fn data_update(&mut self, changed: &ChangeSet, ctx: &TabContext<'_>) -> Vec<UiMutation> {
        if !changed.contains(keys::RECORDING) {
            return Vec::new();
        }
        self.playhead = 0;
        self.playing = self.focused && ctx.store.recording_len() > 0;
        self.last_emit = None;
        vec![UiMutation::property(
            "capture",
            "frame_count",
            ctx.store.recording_len(),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScopeConfig;
    use crate::media::FrameRecording;
    use crate::store::ProjectStore;
    use crate::types::Frame;
    use std::sync::Arc;
    use std::time::Duration;

    fn store_with_frames(n: usize) -> ProjectStore {
        let recording = FrameRecording::new();
        for i in 0..n {
            recording.push(Duration::from_millis(i as u64), Frame::new(2, 2));
        }
        let mut store = ProjectStore::new();
        store.set_recording(Some(Arc::new(recording)));
        store
    }

    #[test]
    fn test_plays_with_period_and_wraps() {
        let store = store_with_frames(2);
        let config = ScopeConfig {
            play_rate_hz: 1_000_000.0,
            ..Default::default()
        };
        let ctx = TabContext {
            store: &store,
            config: &config,
            origin: None,
        };
        let mut tab = CaptureTab::new();
        tab.focus(true, &ctx);
        assert!(tab.is_playing());

        let mut emitted = 0;
        while emitted < 3 {
            if let Some(TabFrame::Timed { period, .. }) = tab.frame(&ctx).unwrap() {
                assert_eq!(period, config.play_period());
                emitted += 1;
            }
        }
        // Two frames then wrap back to the first
        assert_eq!(tab.playhead(), 1);
    }

    #[test]
    fn test_no_recording_no_playback() {
        let store = ProjectStore::new();
        let config = ScopeConfig::default();
        let ctx = TabContext {
            store: &store,
            config: &config,
            origin: None,
        };
        let mut tab = CaptureTab::new();
        tab.focus(true, &ctx);
        assert!(!tab.is_playing());
        assert!(tab.frame(&ctx).unwrap().is_none());
    }

    #[test]
    fn test_recording_change_rewinds() {
        let store = store_with_frames(3);
        let config = ScopeConfig::default();
        let ctx = TabContext {
            store: &store,
            config: &config,
            origin: None,
        };
        let mut tab = CaptureTab::new();
        tab.focus(true, &ctx);
        tab.frame(&ctx).unwrap();
        assert_eq!(tab.playhead(), 1);

        let mods = tab.data_update(&ChangeSet::single(keys::RECORDING), &ctx);
        assert_eq!(tab.playhead(), 0);
        assert_eq!(mods, vec![UiMutation::property("capture", "frame_count", 3)]);

        assert!(tab
            .data_update(&ChangeSet::single(keys::OBJ_DATA), &ctx)
            .is_empty());
    }

    #[test]
    fn test_recording_arriving_while_focused_starts_playback() {
        let config = ScopeConfig::default();
        let empty = ProjectStore::new();
        let mut tab = CaptureTab::new();
        tab.focus(
            true,
            &TabContext {
                store: &empty,
                config: &config,
                origin: None,
            },
        );
        assert!(!tab.is_playing());

        let loaded = store_with_frames(3);
        let ctx = TabContext {
            store: &loaded,
            config: &config,
            origin: None,
        };
        tab.data_update(&ChangeSet::single(keys::RECORDING), &ctx);
        assert!(tab.is_playing());
        assert!(tab.frame(&ctx).unwrap().is_some());

        // Unfocused tabs stay paused when the recording changes
        tab.focus(false, &ctx);
        tab.data_update(&ChangeSet::single(keys::RECORDING), &ctx);
        assert!(!tab.is_playing());
    }
}

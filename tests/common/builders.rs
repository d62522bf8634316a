//! Test data builders for creating test objects

use image::Rgb;
use motionscope::{
    config::ScopeConfig,
    engine::Engine,
    media::{FrameRecording, PlanarPerspective, RecordedFrame, TestPatternSource},
    project::{ProjectController, ProjectFiles},
    tab::{registry, Tab},
    types::Frame,
    ui::UiBridge,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use super::mock_helpers::RecordedProgress;

/// Builder for in-memory recordings
pub struct RecordingBuilder {
    frames: usize,
    width: u32,
    height: u32,
}

impl RecordingBuilder {
    pub fn new() -> Self {
        Self {
            frames: 0,
            width: 4,
            height: 3,
        }
    }

    pub fn frames(mut self, frames: usize) -> Self {
        self.frames = frames;
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn build(self) -> Arc<FrameRecording> {
        let frames = (0..self.frames)
            .map(|i| RecordedFrame {
                pts: Duration::from_millis(33 * i as u64),
                image: Frame::from_pixel(self.width, self.height, Rgb([i as u8, 64, 128])),
            })
            .collect();
        Arc::new(FrameRecording::from_frames(frames))
    }
}

/// A controller wired to a temporary media directory
pub struct ScopeHarness {
    pub dir: TempDir,
    pub engine: Arc<Engine>,
    pub perspective: Arc<PlanarPerspective>,
    pub controller: ProjectController,
    pub bridge: UiBridge,
    pub load_progress: RecordedProgress,
    pub save_progress: RecordedProgress,
}

impl ScopeHarness {
    pub fn files(&self) -> &ProjectFiles {
        self.controller.files()
    }
}

/// Builder for [`ScopeHarness`]
pub struct HarnessBuilder {
    config: ScopeConfig,
    tabs: Option<Vec<Box<dyn Tab>>>,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            config: ScopeConfig {
                bg_cnt_final: 30,
                update_rate_hz: 1000,
                min_dialog_display_ms: 0,
                ..Default::default()
            },
            tabs: None,
        }
    }

    /// Use these tabs instead of the standard set
    pub fn tabs(mut self, tabs: Vec<Box<dyn Tab>>) -> Self {
        self.tabs = Some(tabs);
        self
    }

    pub fn bg_cnt_final(mut self, count: usize) -> Self {
        self.config.bg_cnt_final = count;
        self
    }

    pub fn min_dialog_display_ms(mut self, ms: u64) -> Self {
        self.config.min_dialog_display_ms = ms;
        self
    }

    pub fn build(self) -> ScopeHarness {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let tabs = self.tabs.unwrap_or_else(|| {
            registry::build_tabs(Box::new(TestPatternSource::new(4, 3, Duration::ZERO)))
        });
        let engine = Arc::new(Engine::new(tabs, self.config).expect("Failed to build engine"));
        let perspective = Arc::new(PlanarPerspective::new());
        let (bridge, ui) = UiBridge::new();

        let load_progress = RecordedProgress::default();
        let save_progress = RecordedProgress::default();
        let controller = ProjectController::new(
            engine.clone(),
            ProjectFiles::new(dir.path().join("media")),
            perspective.clone(),
            ui,
        )
        .expect("Failed to create controller")
        .with_progress_sinks(
            Arc::new(load_progress.clone()),
            Arc::new(save_progress.clone()),
        );

        ScopeHarness {
            dir,
            engine,
            perspective,
            controller,
            bridge,
            load_progress,
            save_progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motionscope::media::Recording;

    #[test]
    fn test_recording_builder() {
        let recording = RecordingBuilder::new().frames(3).size(2, 2).build();
        assert_eq!(recording.len(), 3);
        assert_eq!(recording.frame(2).unwrap().dimensions(), (2, 2));
    }
}

//! Core data types used throughout MotionScope
//!
//! This module contains the fundamental types shared by the store, the tabs,
//! the streaming loop and the project controller.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A video frame as produced by the camera or a recording.
pub type Frame = image::RgbImage;

/// Identifies one of the fixed set of tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TabKind {
    /// Live camera view and perspective calibration
    Camera,
    /// Recording capture and playback
    Capture,
    /// Motion processing of the recording
    Process,
    /// Graphs and analysis of the processed object data
    Analyze,
}

impl TabKind {
    /// All tab kinds in navigation order
    pub const ALL: [TabKind; 4] = [
        TabKind::Camera,
        TabKind::Capture,
        TabKind::Process,
        TabKind::Analyze,
    ];

    /// Display name for the navigation bar
    pub fn display_name(&self) -> &'static str {
        match self {
            TabKind::Camera => "Camera",
            TabKind::Capture => "Capture",
            TabKind::Process => "Process",
            TabKind::Analyze => "Analyze",
        }
    }

    /// Whether navigation to this tab starts disabled and is unlocked by data
    pub fn is_gated(&self) -> bool {
        matches!(self, TabKind::Process | TabKind::Analyze)
    }
}

impl std::fmt::Display for TabKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What a focused tab hands to the streaming loop on one tick.
#[derive(Debug, Clone)]
pub enum TabFrame {
    /// A frame to display at the sink's default timing
    Frame(Frame),
    /// A frame with the period the display should honor
    Timed { frame: Frame, period: Duration },
}

impl TabFrame {
    /// Split into the frame and its optional period.
    pub fn into_parts(self) -> (Frame, Option<Duration>) {
        match self {
            TabFrame::Frame(frame) => (frame, None),
            TabFrame::Timed { frame, period } => (frame, Some(period)),
        }
    }
}

impl From<Frame> for TabFrame {
    fn from(frame: Frame) -> Self {
        TabFrame::Frame(frame)
    }
}

/// The two progress dialogs driven by background workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKind {
    Loading,
    Saving,
}

impl DialogKind {
    /// Dialog title
    pub fn title(&self) -> &'static str {
        match self {
            DialogKind::Loading => "Loading...",
            DialogKind::Saving => "Saving...",
        }
    }
}

/// Destructive actions that must be confirmed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    /// Save-as onto an existing project name
    Overwrite,
    /// Delete a project from the picker
    Delete,
}

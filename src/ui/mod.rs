//! UI boundary of the core
//!
//! The core never touches widgets. Everything it wants the interface to do
//! is expressed as a [`UiMutation`] and pushed over the [`UiBridge`] to the
//! UI thread, which applies the mutations in order.
//!
//! - [`bridge`] - channel pair between core threads and the UI thread
//! - [`menu`] - File menu state and item identifiers
//! - [`progress`] - progress sink contract and the dialog implementation

pub mod bridge;
pub mod menu;
pub mod progress;

pub use bridge::{UiBridge, UiPusher};
pub use menu::{FileMenuItem, FileMenuState};
pub use progress::{ProgressDialog, ProgressSink};

use crate::types::{ConfirmKind, DialogKind, TabKind};

/// A single change the UI thread should apply.
///
/// Tabs, the propagation engine and the project controller all return
/// `Vec<UiMutation>` instead of touching the interface directly.
#[derive(Debug, Clone, PartialEq)]
pub enum UiMutation {
    // Navigation
    /// Show or hide a tab's panel
    TabPanelOpen { tab: TabKind, open: bool },
    /// Mark a tab's navigation entry as the active one
    NavActive { tab: TabKind, active: bool },
    /// Enable or disable a tab's navigation entry
    NavEnabled { tab: TabKind, enabled: bool },

    // File menu and project picker
    /// Replace the File menu contents
    FileMenu(FileMenuState),
    /// Replace the project picker options
    ProjectList(Vec<String>),
    /// Show the project picker
    OpenPicker,
    /// Show the save-as name prompt
    SaveAsPrompt,
    /// Ask the user to confirm a destructive action
    Confirm {
        kind: ConfirmKind,
        name: String,
        prompt: String,
    },

    // Progress dialogs
    /// Set a progress dialog's value (0..=100)
    ProgressValue { dialog: DialogKind, percent: u8 },
    /// Open or close a progress dialog
    ProgressOpen { dialog: DialogKind, open: bool },

    // Perspective and graphs
    /// Enable or disable the perspective controls
    PerspectiveEnabled(bool),
    /// Update the perspective controls to these parameters
    PerspectiveParams(serde_json::Value),
    /// Redraw all analysis graphs
    RedrawGraphs,

    /// Tab-specific property update (`target.property = value`)
    Property {
        target: String,
        property: String,
        value: serde_json::Value,
    },
}

impl UiMutation {
    /// Convenience constructor for [`UiMutation::Property`]
    pub fn property(
        target: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        UiMutation::Property {
            target: target.into(),
            property: property.into(),
            value: value.into(),
        }
    }
}

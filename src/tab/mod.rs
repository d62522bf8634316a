//! Tab trait - uniform lifecycle contract for all tabs.
//!
//! Each tab implements `Tab`, and the engine dispatches through the trait.
//! Tabs never mutate the Project Store directly: they read it through
//! [`TabContext`] and return [`UiMutation`]s for the UI thread.

pub mod registry;

use crate::config::ScopeConfig;
use crate::error::Result;
use crate::store::{ChangeSet, ProjectStore};
use crate::types::{TabFrame, TabKind};
use crate::ui::UiMutation;

/// Read-only view handed to tab callbacks.
pub struct TabContext<'a> {
    pub store: &'a ProjectStore,
    pub config: &'a ScopeConfig,
    /// Tab whose commit caused the change, `None` for the project controller
    pub origin: Option<TabKind>,
}

/// Trait implemented by all tabs.
pub trait Tab: Send {
    /// Tab kind identifier.
    fn kind(&self) -> TabKind;

    /// Clear tab-local state. Called on project close and before open; must
    /// be idempotent.
    fn reset(&mut self) -> Vec<UiMutation>;

    /// Called when the tab gains (`enter == true`) or loses focus.
    fn focus(&mut self, enter: bool, ctx: &TabContext<'_>) -> Vec<UiMutation>;

    /// Produce this tick's frame while focused.
    ///
    /// Runs under the shared lock on the streaming thread, so it must return
    /// promptly. Errors drop the frame.
    fn frame(&mut self, _ctx: &TabContext<'_>) -> Result<Option<TabFrame>> {
        Ok(None)
    }

    /// React to store changes. Called with every change set, in any order,
    /// with partial or full key sets.
    fn data_update(&mut self, changed: &ChangeSet, ctx: &TabContext<'_>) -> Vec<UiMutation>;
}

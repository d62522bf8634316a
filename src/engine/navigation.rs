//! Tab navigation state: which entries are enabled, which one is active

use std::collections::HashMap;

use crate::types::TabKind;
use crate::ui::UiMutation;

/// Enabled flags of the navigation entries.
///
/// Gated tabs (Process, Analyze) start disabled and are unlocked by data
/// readiness; the others are always enabled.
#[derive(Debug, Clone)]
pub struct Navigation {
    enabled: HashMap<TabKind, bool>,
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigation {
    pub fn new() -> Self {
        Self {
            enabled: TabKind::ALL
                .iter()
                .map(|kind| (*kind, !kind.is_gated()))
                .collect(),
        }
    }

    pub fn is_enabled(&self, kind: TabKind) -> bool {
        self.enabled.get(&kind).copied().unwrap_or(false)
    }

    /// Set an entry's enabled flag and return the matching mutation
    pub fn set_enabled(&mut self, kind: TabKind, enabled: bool) -> UiMutation {
        self.enabled.insert(kind, enabled);
        UiMutation::NavEnabled { tab: kind, enabled }
    }

    /// Disable every gated entry
    pub fn reset(&mut self) -> Vec<UiMutation> {
        [TabKind::Analyze, TabKind::Process]
            .into_iter()
            .map(|kind| self.set_enabled(kind, false))
            .collect()
    }

    /// Panel visibility and active flags for a focus change to `focused`
    pub fn focus_mutations(
        kinds: impl Iterator<Item = TabKind> + Clone,
        focused: TabKind,
    ) -> Vec<UiMutation> {
        kinds
            .clone()
            .map(|tab| UiMutation::TabPanelOpen {
                tab,
                open: tab == focused,
            })
            .chain(kinds.map(|tab| UiMutation::NavActive {
                tab,
                active: tab == focused,
            }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gated_entries_start_disabled() {
        let nav = Navigation::new();
        assert!(nav.is_enabled(TabKind::Camera));
        assert!(nav.is_enabled(TabKind::Capture));
        assert!(!nav.is_enabled(TabKind::Process));
        assert!(!nav.is_enabled(TabKind::Analyze));
    }

    #[test]
    fn test_reset_disables_gated() {
        let mut nav = Navigation::new();
        nav.set_enabled(TabKind::Process, true);
        nav.set_enabled(TabKind::Analyze, true);
        let mods = nav.reset();
        assert_eq!(mods.len(), 2);
        assert!(!nav.is_enabled(TabKind::Process));
        assert!(!nav.is_enabled(TabKind::Analyze));
    }

    #[test]
    fn test_focus_mutations_mark_exactly_one() {
        let mods = Navigation::focus_mutations(TabKind::ALL.into_iter(), TabKind::Capture);
        assert_eq!(mods.len(), 8);
        let open: Vec<_> = mods
            .iter()
            .filter(|m| matches!(m, UiMutation::TabPanelOpen { open: true, .. }))
            .collect();
        assert_eq!(
            open,
            vec![&UiMutation::TabPanelOpen {
                tab: TabKind::Capture,
                open: true
            }]
        );
    }
}

//! Change Propagation Engine
//!
//! The engine owns the only copy of the mutable core state: the Project
//! Store, the tabs, the focused-tab index, the navigation flags and the File
//! menu. All of it sits behind one `parking_lot::Mutex`, which gives the two
//! protected operations their atomicity:
//!
//! - **Tab switch**: exiting the old tab and entering the new one happens in
//!   a single critical section, so the streaming loop sees either the old or
//!   the new tab focused, never both or neither.
//! - **Store mutation**: writes and the fan-out that follows them happen in
//!   a single critical section, so tabs always react to a consistent store.
//!
//! # Fan-out
//!
//! [`Engine::data_update`] calls every tab's `data_update` in tab order and
//! then applies the cross-cutting rules:
//!
//! - `recording` changed: a recording longer than `bg_cnt_final` enables
//!   Process and refreshes the File menu; a shorter one disables Process
//! - `obj_data` changed: non-empty enables Analyze and focuses it, empty
//!   disables it
//!
//! The lock is not reentrant. Nothing inside a critical section calls back
//! into a public `Engine` method.

pub mod navigation;

pub use navigation::Navigation;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::config::ScopeConfig;
use crate::error::{MotionScopeError, Result};
use crate::media::SharedRecording;
use crate::store::{keys, ChangeSet, ProjectStore, StoreUpdate};
use crate::tab::{registry, Tab, TabContext};
use crate::types::{TabFrame, TabKind};
use crate::ui::{FileMenuState, UiMutation};

/// Result of one streaming tick
#[derive(Debug)]
pub enum TickOutcome {
    /// The focused tab produced a frame
    Frame(TabFrame),
    /// No frame this tick
    Idle,
    /// The focused tab failed or panicked; the frame is dropped
    Fault(String),
}

struct Core {
    store: ProjectStore,
    tabs: Vec<Box<dyn Tab>>,
    focused: usize,
    nav: Navigation,
    menu: FileMenuState,
    /// Bumped on every change not caused by loading from disk
    revision: u64,
}

impl Core {
    fn position(&self, kind: TabKind) -> Option<usize> {
        self.tabs.iter().position(|t| t.kind() == kind)
    }

    fn focused_kind(&self) -> TabKind {
        self.tabs[self.focused].kind()
    }

    /// Exit the focused tab and enter `target`.
    fn focus(&mut self, config: &ScopeConfig, target: usize) -> Vec<UiMutation> {
        let Core {
            store,
            tabs,
            focused,
            ..
        } = self;
        let ctx = TabContext {
            store,
            config,
            origin: None,
        };

        let mut mods =
            Navigation::focus_mutations(tabs.iter().map(|t| t.kind()), tabs[target].kind());
        mods.extend(tabs[*focused].focus(false, &ctx));
        *focused = target;
        mods.extend(tabs[target].focus(true, &ctx));
        mods
    }

    fn focus_kind(&mut self, config: &ScopeConfig, kind: TabKind) -> Vec<UiMutation> {
        match self.position(kind) {
            Some(target) => self.focus(config, target),
            None => Vec::new(),
        }
    }

    /// Disable a gated tab, moving focus to the Camera tab if it was focused.
    fn disable(&mut self, config: &ScopeConfig, kind: TabKind) -> Vec<UiMutation> {
        let mut mods = vec![self.nav.set_enabled(kind, false)];
        if self.focused_kind() == kind {
            mods.extend(self.focus_kind(config, TabKind::Camera));
        }
        mods
    }

    fn fan_out(
        &mut self,
        config: &ScopeConfig,
        changed: &ChangeSet,
        origin: Option<TabKind>,
    ) -> Vec<UiMutation> {
        let mut mods = Vec::new();
        {
            let Core { store, tabs, .. } = &mut *self;
            let ctx = TabContext {
                store,
                config,
                origin,
            };
            for tab in tabs.iter_mut() {
                mods.extend(tab.data_update(changed, &ctx));
            }
        }

        if changed.contains(keys::RECORDING) {
            let len = self.store.recording_len();
            if len > config.bg_cnt_final {
                mods.push(UiMutation::FileMenu(self.menu.clone()));
                mods.push(self.nav.set_enabled(TabKind::Process, true));
            } else if self.nav.is_enabled(TabKind::Process) {
                mods.extend(self.disable(config, TabKind::Process));
            }
        }

        if changed.contains(keys::OBJ_DATA) {
            if self.store.has_obj_data() {
                mods.push(self.nav.set_enabled(TabKind::Analyze, true));
                mods.extend(self.focus_kind(config, TabKind::Analyze));
            } else {
                mods.extend(self.disable(config, TabKind::Analyze));
            }
        }

        mods
    }
}

/// Owner of the shared core state and entry point for every mutation.
pub struct Engine {
    core: Mutex<Core>,
    config: ScopeConfig,
}

impl Engine {
    /// Create an engine over a tab set. The Camera tab is the focused tab;
    /// it is entered on the first reset.
    pub fn new(tabs: Vec<Box<dyn Tab>>, config: ScopeConfig) -> Result<Self> {
        registry::validate_tabs(&tabs)?;
        let focused = tabs
            .iter()
            .position(|t| t.kind() == TabKind::Camera)
            .unwrap_or(0);

        Ok(Self {
            core: Mutex::new(Core {
                store: ProjectStore::new(),
                tabs,
                focused,
                nav: Navigation::new(),
                menu: FileMenuState::default(),
                revision: 0,
            }),
            config,
        })
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Read the store under the lock
    pub fn with_store<R>(&self, f: impl FnOnce(&ProjectStore) -> R) -> R {
        f(&self.core.lock().store)
    }

    /// Currently focused tab
    pub fn focused_tab(&self) -> TabKind {
        self.core.lock().focused_kind()
    }

    /// Whether a tab's navigation entry is enabled
    pub fn is_tab_enabled(&self, kind: TabKind) -> bool {
        self.core.lock().nav.is_enabled(kind)
    }

    /// Current File menu state
    pub fn menu(&self) -> FileMenuState {
        self.core.lock().menu.clone()
    }

    /// Change counter, used to tell whether the open project has unsaved
    /// changes
    pub fn revision(&self) -> u64 {
        self.core.lock().revision
    }

    /// Navigate to a tab on behalf of the user. Disabled tabs are refused.
    pub fn select_tab(&self, kind: TabKind) -> Result<Vec<UiMutation>> {
        let mut core = self.core.lock();
        if !core.nav.is_enabled(kind) {
            return Err(MotionScopeError::TabDisabled(kind));
        }
        let target = core.position(kind).ok_or_else(|| {
            MotionScopeError::Config(format!("tab {} is not registered", kind))
        })?;
        tracing::debug!("Focus {} -> {}", core.focused_kind(), kind);
        Ok(core.focus(&self.config, target))
    }

    /// Notify every tab and the cross-cutting rules of a change.
    pub fn data_update(&self, changed: &ChangeSet) -> Vec<UiMutation> {
        if changed.is_empty() {
            return Vec::new();
        }
        tracing::debug!("Propagating change {}", changed);
        self.core.lock().fan_out(&self.config, changed, None)
    }

    /// Commit derived keys on behalf of a tab's collaborator and propagate
    /// the change. `project` and `recording` are refused.
    pub fn commit(&self, update: StoreUpdate, origin: TabKind) -> Result<Vec<UiMutation>> {
        if let Some(key) = update.keys().find(|k| keys::is_reserved(k)) {
            return Err(MotionScopeError::ReservedKey(key.to_string()));
        }
        if update.is_empty() {
            return Ok(Vec::new());
        }

        let mut core = self.core.lock();
        let changed = core.store.apply(update);
        core.revision += 1;
        tracing::debug!("{} committed {}", origin, changed);
        Ok(core.fan_out(&self.config, &changed, Some(origin)))
    }

    /// One streaming tick: call the focused tab's `frame()` under the lock.
    pub fn tick(&self) -> TickOutcome {
        let mut guard = self.core.lock();
        let Core {
            store,
            tabs,
            focused,
            ..
        } = &mut *guard;
        let ctx = TabContext {
            store,
            config: &self.config,
            origin: None,
        };
        let tab = &mut tabs[*focused];

        match catch_unwind(AssertUnwindSafe(|| tab.frame(&ctx))) {
            Ok(Ok(Some(frame))) => TickOutcome::Frame(frame),
            Ok(Ok(None)) => TickOutcome::Idle,
            Ok(Err(e)) => TickOutcome::Fault(format!("{} tab: {}", tab.kind(), e)),
            Err(_) => TickOutcome::Fault(format!("{} tab panicked in frame()", tab.kind())),
        }
    }

    // ==================== Controller-only operations ====================

    /// Full reset: tabs, store, navigation, menu and focus back to Camera.
    pub(crate) fn reset(&self) -> Vec<UiMutation> {
        let mut core = self.core.lock();
        let mut mods: Vec<UiMutation> = core.tabs.iter_mut().flat_map(|t| t.reset()).collect();

        core.store.clear();
        core.menu.clear_project();
        mods.extend(core.focus_kind(&self.config, TabKind::Camera));
        mods.extend(core.nav.reset());
        mods.push(UiMutation::FileMenu(core.menu.clone()));
        mods
    }

    /// Set the project name and show it in the File menu
    pub(crate) fn set_project(&self, name: &str) -> Vec<UiMutation> {
        let mut core = self.core.lock();
        core.store.set(keys::PROJECT, Value::String(name.to_string()));
        core.menu.set_project(name);
        vec![UiMutation::FileMenu(core.menu.clone())]
    }

    /// Replace the recording without notifying anyone
    pub(crate) fn set_recording(&self, recording: Option<SharedRecording>) {
        self.core.lock().store.set_recording(recording);
    }

    /// Replace the recording and propagate the change
    pub(crate) fn install_recording(&self, recording: SharedRecording) -> Vec<UiMutation> {
        let mut core = self.core.lock();
        core.store.set_recording(Some(recording));
        core.revision += 1;
        core.fan_out(&self.config, &ChangeSet::single(keys::RECORDING), None)
    }

    pub(crate) fn recording(&self) -> Option<SharedRecording> {
        self.core.lock().store.recording().cloned()
    }

    /// Deep-merge loaded metadata, returning the keys it touched
    pub(crate) fn merge_metadata(&self, metadata: Map<String, Value>) -> ChangeSet {
        self.core.lock().store.merge(metadata)
    }

    /// Record the perspective parameters and snapshot the serializable part
    /// of the store
    pub(crate) fn snapshot_metadata(&self, perspective: Value) -> Map<String, Value> {
        let mut core = self.core.lock();
        core.store.set(keys::PERSPECTIVE, perspective);
        core.store.metadata()
    }

    /// Update the project picker and the Open entry
    pub(crate) fn refresh_projects(&self, names: Vec<String>) -> Vec<UiMutation> {
        let mut core = self.core.lock();
        core.menu.set_projects_available(!names.is_empty());
        vec![
            UiMutation::FileMenu(core.menu.clone()),
            UiMutation::ProjectList(names),
        ]
    }
}

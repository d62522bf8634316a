//! Mock construction helpers

use motionscope::{
    error::{MotionScopeError, Result},
    store::ChangeSet,
    tab::{Tab, TabContext},
    types::{Frame, TabFrame, TabKind},
    ui::{ProgressSink, UiMutation},
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Something a scripted tab was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum TabEvent {
    Reset(TabKind),
    Focus(TabKind, bool),
    DataUpdate {
        tab: TabKind,
        keys: Vec<String>,
        origin: Option<TabKind>,
    },
}

/// Shared, ordered log of tab events
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<TabEvent>>>);

impl EventLog {
    pub fn push(&self, event: TabEvent) {
        self.0.lock().push(event);
    }

    pub fn take(&self) -> Vec<TabEvent> {
        std::mem::take(&mut *self.0.lock())
    }
}

/// What a scripted tab's `frame()` does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameScript {
    Nothing,
    Frame,
    Timed(Duration),
    Fail,
    Panic,
}

/// Tab that logs every call and produces frames from a script
pub struct ScriptedTab {
    kind: TabKind,
    script: FrameScript,
    log: EventLog,
    focused: bool,
    /// `frame()` calls made while this tab was not focused
    unfocused_frames: Arc<AtomicUsize>,
    frames: Arc<AtomicUsize>,
}

impl ScriptedTab {
    pub fn new(kind: TabKind, log: EventLog) -> Self {
        Self {
            kind,
            script: FrameScript::Nothing,
            log,
            focused: false,
            unfocused_frames: Arc::new(AtomicUsize::new(0)),
            frames: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn script(mut self, script: FrameScript) -> Self {
        self.script = script;
        self
    }

    /// Counter of `frame()` calls made while unfocused
    pub fn unfocused_counter(&self) -> Arc<AtomicUsize> {
        self.unfocused_frames.clone()
    }

    /// Counter of all `frame()` calls
    pub fn frame_counter(&self) -> Arc<AtomicUsize> {
        self.frames.clone()
    }
}

impl Tab for ScriptedTab {
    fn kind(&self) -> TabKind {
        self.kind
    }

    fn reset(&mut self) -> Vec<UiMutation> {
        self.log.push(TabEvent::Reset(self.kind));
        Vec::new()
    }

    fn focus(&mut self, enter: bool, _ctx: &TabContext<'_>) -> Vec<UiMutation> {
        self.focused = enter;
        self.log.push(TabEvent::Focus(self.kind, enter));
        Vec::new()
    }

    fn frame(&mut self, _ctx: &TabContext<'_>) -> Result<Option<TabFrame>> {
        self.frames.fetch_add(1, Ordering::SeqCst);
        if !self.focused {
            self.unfocused_frames.fetch_add(1, Ordering::SeqCst);
        }
        match self.script {
            FrameScript::Nothing => Ok(None),
            FrameScript::Frame => Ok(Some(TabFrame::Frame(Frame::new(2, 2)))),
            FrameScript::Timed(period) => Ok(Some(TabFrame::Timed {
                frame: Frame::new(2, 2),
                period,
            })),
            FrameScript::Fail => Err(MotionScopeError::Recording("scripted failure".to_string())),
            FrameScript::Panic => panic!("scripted panic"),
        }
    }

    fn data_update(&mut self, changed: &ChangeSet, ctx: &TabContext<'_>) -> Vec<UiMutation> {
        self.log.push(TabEvent::DataUpdate {
            tab: self.kind,
            keys: changed.iter().map(str::to_string).collect(),
            origin: ctx.origin,
        });
        Vec::new()
    }
}

/// Build one scripted tab per kind, all logging to `log`
pub fn scripted_tabs(log: &EventLog) -> Vec<Box<dyn Tab>> {
    TabKind::ALL
        .iter()
        .map(|kind| Box::new(ScriptedTab::new(*kind, log.clone())) as Box<dyn Tab>)
        .collect()
}

/// A progress sink call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Progress(u8),
    Open(bool),
}

/// Progress sink recording every call
#[derive(Debug, Clone, Default)]
pub struct RecordedProgress(Arc<Mutex<Vec<ProgressEvent>>>);

impl RecordedProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.0.lock().clone()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

impl ProgressSink for RecordedProgress {
    fn progress(&self, percent: u8) {
        self.0.lock().push(ProgressEvent::Progress(percent));
    }

    fn open(&self, open: bool) {
        self.0.lock().push(ProgressEvent::Open(open));
    }
}

//! Project Lifecycle Controller
//!
//! The controller is the sole writer of the `project` and `recording` keys.
//! It runs on the UI/event thread, serializes Open/Save/SaveAs/Close/Delete
//! (a new operation first waits for the in-flight worker), and hands the
//! long transfers to a background [`worker`](super::worker).
//!
//! Destructive actions are two-step: [`ProjectController::save_as`] onto an
//! existing name and [`ProjectController::request_delete`] only raise a
//! confirmation; nothing touches the disk until
//! [`ProjectController::respond`] is called with `true`.

use std::sync::Arc;

use crate::engine::Engine;
use crate::error::{MotionScopeError, Result};
use crate::media::{FrameRecording, Perspective, SharedRecording};
use crate::project::worker::{Job, OperationKind, WorkerHandle, WorkerReport};
use crate::project::{validate_name, ProjectFiles};
use crate::types::{ConfirmKind, DialogKind};
use crate::ui::{FileMenuItem, ProgressDialog, ProgressSink, UiMutation, UiPusher};

/// Creates the empty recording a load fills in
pub type RecordingFactory = Box<dyn Fn() -> SharedRecording + Send>;

/// Where the controller is in the project lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    NoProject,
    /// `saved` is false once anything changed since the last save or load
    ProjectOpen { name: String, saved: bool },
}

/// Result of a save-as request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAsStatus {
    /// The save is running
    Saving,
    /// The name is taken; waiting for [`ProjectController::respond`]
    NeedsConfirmation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingConfirm {
    Overwrite(String),
    Delete(String),
}

/// Orchestrates the project lifecycle.
pub struct ProjectController {
    engine: Arc<Engine>,
    files: ProjectFiles,
    perspective: Arc<dyn Perspective>,
    ui: UiPusher,
    load_dialog: Arc<dyn ProgressSink>,
    save_dialog: Arc<dyn ProgressSink>,
    new_recording: RecordingFactory,
    worker: Option<WorkerHandle>,
    pending: Option<PendingConfirm>,
    /// Engine revision at the last completed save or load
    saved_revision: Option<u64>,
    last_report: Option<WorkerReport>,
}

impl ProjectController {
    /// Create the controller, make sure the media directory exists and push
    /// the initial project list and reset state.
    pub fn new(
        engine: Arc<Engine>,
        files: ProjectFiles,
        perspective: Arc<dyn Perspective>,
        ui: UiPusher,
    ) -> Result<Self> {
        files.ensure_media_dir()?;

        let controller = Self {
            load_dialog: Arc::new(ProgressDialog::new(DialogKind::Loading, ui.clone())),
            save_dialog: Arc::new(ProgressDialog::new(DialogKind::Saving, ui.clone())),
            engine,
            files,
            perspective,
            ui,
            new_recording: Box::new(|| -> SharedRecording {
                Arc::new(FrameRecording::new())
            }),
            worker: None,
            pending: None,
            saved_revision: None,
            last_report: None,
        };

        controller.refresh_projects();
        controller.ui.push_mods(controller.reset_mods());
        Ok(controller)
    }

    /// Replace the Loading/Saving progress sinks
    pub fn with_progress_sinks(
        mut self,
        load: Arc<dyn ProgressSink>,
        save: Arc<dyn ProgressSink>,
    ) -> Self {
        self.load_dialog = load;
        self.save_dialog = save;
        self
    }

    /// Replace how empty recordings are created for loads
    pub fn with_recording_factory(
        mut self,
        factory: impl Fn() -> SharedRecording + Send + 'static,
    ) -> Self {
        self.new_recording = Box::new(factory);
        self
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub fn files(&self) -> &ProjectFiles {
        &self.files
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        match self.engine.with_store(|s| s.project().map(str::to_string)) {
            None => LifecycleState::NoProject,
            Some(name) => LifecycleState::ProjectOpen {
                name,
                saved: self.saved_revision == Some(self.engine.revision()),
            },
        }
    }

    /// Name of the open project
    pub fn project(&self) -> Option<String> {
        self.engine.with_store(|s| s.project().map(str::to_string))
    }

    /// Whether a save or load is still running
    pub fn is_busy(&mut self) -> bool {
        self.poll_worker();
        self.worker.is_some()
    }

    /// Report of the last finished save or load
    pub fn last_report(&self) -> Option<&WorkerReport> {
        self.last_report.as_ref()
    }

    /// The confirmation the controller is waiting for, if any
    pub fn pending_confirmation(&self) -> Option<(ConfirmKind, &str)> {
        match &self.pending {
            Some(PendingConfirm::Overwrite(name)) => {
                Some((ConfirmKind::Overwrite, name.as_str()))
            }
            Some(PendingConfirm::Delete(name)) => Some((ConfirmKind::Delete, name.as_str())),
            None => None,
        }
    }

    /// Collect the worker's report if it has finished, without blocking
    pub fn poll_worker(&mut self) -> Option<&WorkerReport> {
        if self.worker.as_ref().is_some_and(WorkerHandle::is_finished) {
            if let Some(worker) = self.worker.take() {
                self.finish(worker.wait());
                return self.last_report.as_ref();
            }
        }
        None
    }

    /// Block until the in-flight save or load (if any) has finished
    pub fn wait_idle(&mut self) -> Option<&WorkerReport> {
        let worker = self.worker.take()?;
        tracing::debug!("Waiting for {} of {:?}", worker.kind(), worker.project());
        self.finish(worker.wait());
        self.last_report.as_ref()
    }

    fn finish(&mut self, report: WorkerReport) {
        if report.outcome.is_completed() {
            self.saved_revision = Some(self.engine.revision());
        }
        self.last_report = Some(report);
    }

    // ==================== Lifecycle ====================

    /// Open a project: reset, set the name and load its artifacts in the
    /// background. A project without a raw artifact opens with no recording.
    pub fn open(&mut self, name: &str) -> Result<()> {
        let name = validate_name(name)?;
        self.wait_idle();
        tracing::info!("Opening project {:?}", name);

        self.load_dialog.progress(0);
        self.load_dialog.open(true);

        let mut mods = self.reset_mods();
        mods.extend(self.engine.set_project(&name));
        self.ui.push_mods(mods);
        self.saved_revision = None;

        let recording = if self.files.has_recording(&name) {
            let recording = (self.new_recording)();
            self.engine.set_recording(Some(recording.clone()));
            Some(recording)
        } else {
            None
        };
        self.start(OperationKind::Load, name, recording, false)
    }

    /// Save the open project in the background
    pub fn save(&mut self) -> Result<()> {
        self.save_project(false)
    }

    fn save_project(&mut self, replace_raw: bool) -> Result<()> {
        self.wait_idle();
        let name = self.project().ok_or(MotionScopeError::NoProject)?;
        tracing::info!("Saving project {:?}", name);
        let recording = self.engine.recording();
        self.start(OperationKind::Save, name, recording, replace_raw)
    }

    /// Save under a new name. An existing name needs confirmation first.
    pub fn save_as(&mut self, name: &str) -> Result<SaveAsStatus> {
        let name = validate_name(name)?;
        self.wait_idle();

        if self.files.exists(&name) {
            tracing::info!("Project {:?} exists, asking before overwrite", name);
            self.ui.push_mods(vec![UiMutation::Confirm {
                kind: ConfirmKind::Overwrite,
                prompt: format!("\"{}\" already exists. Do you want to overwrite it?", name),
                name: name.clone(),
            }]);
            self.pending = Some(PendingConfirm::Overwrite(name));
            return Ok(SaveAsStatus::NeedsConfirmation);
        }

        self.save_renamed(&name)?;
        Ok(SaveAsStatus::Saving)
    }

    fn save_renamed(&mut self, name: &str) -> Result<()> {
        // A raw artifact under another name belongs to some other project
        let replace_raw = self.project().as_deref() != Some(name);
        self.ui.push_mods(self.engine.set_project(name));
        self.save_project(replace_raw)
    }

    /// Ask to delete a saved project
    pub fn request_delete(&mut self, name: &str) -> Result<()> {
        let name = validate_name(name)?;
        if !self.files.exists(&name) {
            return Err(MotionScopeError::Project(format!(
                "no project named {:?}",
                name
            )));
        }
        self.ui.push_mods(vec![UiMutation::Confirm {
            kind: ConfirmKind::Delete,
            prompt: format!("Are you sure you want to delete \"{}\" project?", name),
            name: name.clone(),
        }]);
        self.pending = Some(PendingConfirm::Delete(name));
        Ok(())
    }

    /// Answer the pending confirmation. Declining leaves every file as it
    /// was.
    pub fn respond(&mut self, confirmed: bool) -> Result<()> {
        let Some(pending) = self.pending.take() else {
            tracing::debug!("Confirmation answered with nothing pending");
            return Ok(());
        };

        match (pending, confirmed) {
            (PendingConfirm::Overwrite(name), true) => self.save_renamed(&name),
            (PendingConfirm::Delete(name), true) => self.delete(&name),
            (pending, false) => {
                tracing::info!("Declined {:?}", pending);
                Ok(())
            }
        }
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        self.wait_idle();
        if self.project().as_deref() == Some(name) {
            tracing::info!("Closing {:?} before deleting it", name);
            self.close();
        }
        let result = self.files.delete(name);
        self.refresh_projects();
        result
    }

    /// Close the open project
    pub fn close(&mut self) {
        self.wait_idle();
        if let Some(name) = self.project() {
            tracing::info!("Closing project {:?}", name);
        }
        self.ui.push_mods(self.reset_mods());
        self.saved_revision = None;
    }

    /// Hand over a freshly captured recording
    pub fn install_recording(&mut self, recording: SharedRecording) {
        self.wait_idle();
        tracing::debug!("Installing recording with {} frames", recording.len());
        self.ui.push_mods(self.engine.install_recording(recording));
    }

    /// Dispatch a File menu selection. Disabled items are ignored.
    pub fn handle_menu(&mut self, item: FileMenuItem) -> Result<()> {
        if !self.engine.menu().is_enabled(item) {
            tracing::debug!("Ignoring disabled menu item {}", item.as_str());
            return Ok(());
        }
        match item {
            FileMenuItem::Open => {
                self.refresh_projects();
                self.ui.push_mods(vec![UiMutation::OpenPicker]);
            }
            FileMenuItem::Save => self.save()?,
            FileMenuItem::SaveAs => self.ui.push_mods(vec![UiMutation::SaveAsPrompt]),
            FileMenuItem::Close => self.close(),
        }
        Ok(())
    }

    /// Push the current project list and the Open entry state
    pub fn refresh_projects(&self) {
        self.ui
            .push_mods(self.engine.refresh_projects(self.files.project_names()));
    }

    fn start(
        &mut self,
        kind: OperationKind,
        project: String,
        recording: Option<SharedRecording>,
        replace_raw: bool,
    ) -> Result<()> {
        let sink = match kind.dialog() {
            DialogKind::Loading => self.load_dialog.clone(),
            DialogKind::Saving => self.save_dialog.clone(),
        };
        let job = Job {
            kind,
            project,
            engine: self.engine.clone(),
            files: self.files.clone(),
            perspective: self.perspective.clone(),
            sink,
            ui: self.ui.clone(),
            recording,
            replace_raw,
        };
        self.worker = Some(job.spawn()?);
        Ok(())
    }

    /// Full reset including the perspective
    fn reset_mods(&self) -> Vec<UiMutation> {
        let mut mods = self.engine.reset();
        mods.extend(self.perspective.out_reset());
        mods.extend(self.perspective.out_enable(false));
        mods
    }
}

impl Drop for ProjectController {
    fn drop(&mut self) {
        // Leave complete artifacts behind
        self.wait_idle();
    }
}

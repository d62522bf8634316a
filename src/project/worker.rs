//! Background save/load worker
//!
//! One worker thread runs per save or load. It transfers the raw recording
//! on a scoped helper thread while polling the recording's own progress at
//! `update_rate_hz`, then writes or reads the metadata artifact, runs the
//! change propagation and finally holds the progress dialog open for its
//! minimum display time.
//!
//! Completion of the transfer is signalled by the helper dropping its end of
//! a channel. The worker's own completion is its [`WorkerReport`].

use crossbeam_channel::{bounded, RecvTimeoutError};
use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::engine::Engine;
use crate::error::{MotionScopeError, Result};
use crate::media::{Perspective, SharedRecording};
use crate::project::ProjectFiles;
use crate::store::{keys, ChangeSet};
use crate::types::DialogKind;
use crate::ui::{ProgressSink, UiMutation, UiPusher};

/// Progress value shown once the bulk transfer is done
const TRANSFER_DONE_PERCENT: u8 = 99;

/// Direction of a background transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Load,
    Save,
}

impl OperationKind {
    pub fn dialog(&self) -> DialogKind {
        match self {
            OperationKind::Load => DialogKind::Loading,
            OperationKind::Save => DialogKind::Saving,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Load => write!(f, "load"),
            OperationKind::Save => write!(f, "save"),
        }
    }
}

/// Terminal state of a save or load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Completed,
    /// The operation stopped part way; the message names the failing step
    Failed(String),
}

impl OperationOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, OperationOutcome::Completed)
    }
}

/// What a finished worker reports back to the controller
#[derive(Debug, Clone)]
pub struct WorkerReport {
    pub kind: OperationKind,
    pub project: String,
    pub outcome: OperationOutcome,
    /// Time from start until the dialog closed
    pub elapsed: Duration,
}

/// Handle to a running worker
pub struct WorkerHandle {
    kind: OperationKind,
    project: String,
    thread: JoinHandle<WorkerReport>,
}

impl WorkerHandle {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Whether the worker has finished and can be joined without blocking
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the worker finishes
    pub fn wait(self) -> WorkerReport {
        let Self {
            kind,
            project,
            thread,
        } = self;
        thread.join().unwrap_or_else(|_| {
            tracing::error!("Project {} worker for {:?} panicked", kind, project);
            WorkerReport {
                kind,
                project,
                outcome: OperationOutcome::Failed("worker panicked".to_string()),
                elapsed: Duration::ZERO,
            }
        })
    }
}

/// Everything a worker needs, moved onto its thread
pub(crate) struct Job {
    pub kind: OperationKind,
    pub project: String,
    pub engine: Arc<Engine>,
    pub files: ProjectFiles,
    pub perspective: Arc<dyn Perspective>,
    pub sink: Arc<dyn ProgressSink>,
    pub ui: UiPusher,
    /// Recording to load into or save from
    pub recording: Option<SharedRecording>,
    /// Saving over another project's artifacts; a raw artifact left by
    /// that project must not outlive it
    pub replace_raw: bool,
}

impl Job {
    /// Start the worker thread
    pub fn spawn(self) -> Result<WorkerHandle> {
        let kind = self.kind;
        let project = self.project.clone();
        let thread = std::thread::Builder::new()
            .name(format!("project-{}", kind))
            .spawn(move || self.run())
            .map_err(|e| {
                MotionScopeError::from(e).with_context(format!("Failed to start {} worker", kind))
            })?;
        Ok(WorkerHandle {
            kind,
            project,
            thread,
        })
    }

    /// Run the whole operation on the current thread
    pub fn run(self) -> WorkerReport {
        let started = Instant::now();
        let config = self.engine.config().clone();
        tracing::info!("Project {} of {:?} started", self.kind, self.project);

        self.sink.progress(0);
        self.sink.open(true);

        let transfer = match &self.recording {
            Some(recording) => {
                self.transfer(recording, config.update_interval(), config.progress_offset)
            }
            None => Ok(()),
        };
        self.sink.progress(TRANSFER_DONE_PERCENT);

        let mut mods = Vec::new();
        let outcome = match self.kind {
            OperationKind::Save => self.finish_save(transfer, &mut mods),
            OperationKind::Load => self.finish_load(transfer, &mut mods),
        };
        self.ui.push_mods(mods);

        let min_display = config.min_dialog_display();
        let shown = started.elapsed();
        if shown < min_display {
            std::thread::sleep(min_display - shown);
        }
        self.sink.open(false);

        match &outcome {
            OperationOutcome::Completed => {
                tracing::info!("Project {} of {:?} completed", self.kind, self.project)
            }
            OperationOutcome::Failed(reason) => {
                tracing::error!("Project {} of {:?} failed: {}", self.kind, self.project, reason)
            }
        }

        WorkerReport {
            kind: self.kind,
            project: self.project,
            outcome,
            elapsed: started.elapsed(),
        }
    }

    /// Save or load the raw artifact, forwarding progress while it runs
    fn transfer(&self, recording: &SharedRecording, interval: Duration, offset: u8) -> Result<()> {
        let path = self.files.raw_path(&self.project);
        let kind = self.kind;

        std::thread::scope(|s| {
            let (done_tx, done_rx) = bounded::<()>(0);
            let helper = s.spawn(|| {
                let _done = done_tx;
                run_transfer(kind, recording, &path)
            });

            let mut reported = 0u8;
            loop {
                match done_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let progress = recording.progress();
                        if progress > reported {
                            self.sink.progress(progress.saturating_sub(offset));
                            reported = progress;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            helper.join().unwrap_or_else(|_| {
                Err(MotionScopeError::Recording(format!(
                    "{} of {:?} panicked",
                    kind, path
                )))
            })
        })
    }

    fn finish_save(&self, transfer: Result<()>, mods: &mut Vec<UiMutation>) -> OperationOutcome {
        if let Err(e) = transfer {
            // Metadata without its recording would describe data that is not there
            return OperationOutcome::Failed(format!("recording not saved: {}", e));
        }
        if self.replace_raw && self.recording.is_none() {
            if let Err(e) = self.files.remove_recording(&self.project) {
                return OperationOutcome::Failed(format!("stale recording not removed: {}", e));
            }
        }

        let metadata = self.engine.snapshot_metadata(self.perspective.get_params());
        let outcome = match self.files.write_metadata(&self.project, &metadata) {
            Ok(()) => OperationOutcome::Completed,
            Err(e) => OperationOutcome::Failed(format!("metadata not saved: {}", e)),
        };
        mods.extend(self.engine.refresh_projects(self.files.project_names()));
        outcome
    }

    fn finish_load(&self, transfer: Result<()>, mods: &mut Vec<UiMutation>) -> OperationOutcome {
        let mut failure = None;
        match transfer {
            Ok(()) if self.recording.is_some() => {
                mods.extend(self.engine.data_update(&ChangeSet::single(keys::RECORDING)));
            }
            Ok(()) => {}
            Err(e) => {
                self.engine.set_recording(None);
                failure = Some(format!("recording not loaded: {}", e));
            }
        }

        match self.files.read_metadata(&self.project) {
            Ok(Some(metadata)) => {
                let changed = self.engine.merge_metadata(metadata);
                mods.extend(self.engine.data_update(&changed));
                // Graphs redraw after the perspective is back in place
                let params = self
                    .engine
                    .with_store(|s| s.get(keys::PERSPECTIVE).cloned());
                if let Some(params) = params {
                    mods.extend(self.perspective.set_params(&params));
                }
                mods.push(UiMutation::RedrawGraphs);
            }
            Ok(None) => {
                tracing::debug!("Project {:?} has no metadata", self.project);
            }
            Err(e) => {
                failure.get_or_insert(format!("metadata not loaded: {}", e));
            }
        }

        match failure {
            Some(reason) => OperationOutcome::Failed(reason),
            None => OperationOutcome::Completed,
        }
    }
}

fn run_transfer(kind: OperationKind, recording: &SharedRecording, path: &Path) -> Result<()> {
    match kind {
        OperationKind::Load => recording.load(path),
        OperationKind::Save => recording.save(path),
    }
}

//! Streaming loop
//!
//! A dedicated thread that, every tick, takes the shared lock just long
//! enough to ask the focused tab for a frame, then transforms the frame and
//! pushes it to the display with the lock released.
//!
//! The idle delay between ticks is a yield for the other threads, not a
//! frame-rate governor; tabs pace themselves. The loop stops when its
//! [`StreamerHandle`] is stopped or dropped and turns off the status
//! indicator it owns on the way out.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::engine::{Engine, TickOutcome};
use crate::error::{MotionScopeError, Result};
use crate::media::{DisplaySink, Perspective};

/// Minimum interval between two logged frame faults
const FAULT_LOG_INTERVAL: Duration = Duration::from_secs(1);

/// On/off hook for the hardware status light the streaming loop owns.
#[cfg_attr(test, mockall::automock)]
pub trait StatusIndicator: Send {
    /// Turn the indicator off
    fn off(&mut self);
}

/// Indicator for setups without one
#[derive(Debug, Default)]
pub struct NoIndicator;

impl StatusIndicator for NoIndicator {
    fn off(&mut self) {}
}

/// Counters of a finished streaming loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub ticks: u64,
    /// Frames pushed to the display
    pub frames: u64,
    /// Ticks whose frame was dropped because the tab failed
    pub faults: u64,
}

/// The streaming loop state
pub struct Streamer {
    engine: Arc<Engine>,
    perspective: Arc<dyn Perspective>,
    display: Box<dyn DisplaySink>,
    indicator: Box<dyn StatusIndicator>,
    idle: Duration,
    stats: StreamStats,
    last_fault_log: Option<Instant>,
}

impl Streamer {
    pub fn new(
        engine: Arc<Engine>,
        perspective: Arc<dyn Perspective>,
        display: Box<dyn DisplaySink>,
    ) -> Self {
        let idle = engine.config().stream_idle();
        Self {
            engine,
            perspective,
            display,
            indicator: Box::new(NoIndicator),
            idle,
            stats: StreamStats::default(),
            last_fault_log: None,
        }
    }

    /// Use a status indicator that is turned off when the loop ends
    pub fn with_indicator(mut self, indicator: Box<dyn StatusIndicator>) -> Self {
        self.indicator = indicator;
        self
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Run one tick. Returns whether a frame reached the display.
    pub fn tick(&mut self) -> bool {
        self.stats.ticks += 1;
        match self.engine.tick() {
            TickOutcome::Frame(frame) => {
                let (frame, period) = frame.into_parts();
                let frame = self.perspective.transform(frame);
                self.display.push_frame(frame, period);
                self.stats.frames += 1;
                true
            }
            TickOutcome::Idle => false,
            TickOutcome::Fault(reason) => {
                self.stats.faults += 1;
                let now = Instant::now();
                if self
                    .last_fault_log
                    .map_or(true, |last| now.duration_since(last) >= FAULT_LOG_INTERVAL)
                {
                    tracing::warn!("Dropped frame: {} ({} so far)", reason, self.stats.faults);
                    self.last_fault_log = Some(now);
                }
                false
            }
        }
    }

    /// Tick until `shutdown` fires or its sender is dropped
    pub fn run(mut self, shutdown: Receiver<()>) -> StreamStats {
        tracing::info!("Streaming loop started");
        loop {
            match shutdown.recv_timeout(self.idle) {
                Err(RecvTimeoutError::Timeout) => {
                    self.tick();
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.indicator.off();
        tracing::info!(
            "Streaming loop stopped after {} ticks, {} frames, {} faults",
            self.stats.ticks,
            self.stats.frames,
            self.stats.faults
        );
        self.stats
    }

    /// Run the loop on its own thread
    pub fn spawn(self) -> Result<StreamerHandle> {
        let (shutdown_tx, shutdown_rx) = bounded(1);
        let thread = std::thread::Builder::new()
            .name("streaming".to_string())
            .spawn(move || self.run(shutdown_rx))
            .map_err(|e| MotionScopeError::from(e).with_context("Failed to start streaming loop"))?;
        Ok(StreamerHandle {
            shutdown_tx,
            thread: Some(thread),
        })
    }
}

/// Owner of a running streaming thread
pub struct StreamerHandle {
    shutdown_tx: Sender<()>,
    thread: Option<JoinHandle<StreamStats>>,
}

impl StreamerHandle {
    /// Signal shutdown and wait for the loop to finish
    pub fn stop(mut self) -> Result<StreamStats> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<StreamStats> {
        let _ = self.shutdown_tx.try_send(());
        match self.thread.take() {
            Some(thread) => thread
                .join()
                .map_err(|_| MotionScopeError::Channel("streaming thread panicked".to_string())),
            None => Ok(StreamStats::default()),
        }
    }
}

impl Drop for StreamerHandle {
    fn drop(&mut self) {
        if self.thread.is_some() {
            if let Err(e) = self.shutdown() {
                tracing::error!("{}", e);
            }
        }
    }
}

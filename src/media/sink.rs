//! Display sink fed by the streaming loop

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::types::Frame;

/// Channel capacity for displayed frames. Small on purpose: a slow display
/// sees the newest frames, not a backlog.
const DISPLAY_CHANNEL_CAPACITY: usize = 4;

/// Receives one transformed frame per streaming tick.
pub trait DisplaySink: Send {
    /// Push a frame; `period` is the producer's frame period when it differs
    /// from the display default
    fn push_frame(&mut self, frame: Frame, period: Option<Duration>);
}

/// A frame as delivered to the display
#[derive(Debug, Clone)]
pub struct DisplayFrame {
    pub frame: Frame,
    pub period: Option<Duration>,
}

/// Display sink backed by a bounded channel. Never blocks: when the display
/// falls behind, frames are dropped and counted.
pub struct ChannelSink {
    tx: Sender<DisplayFrame>,
    dropped: Arc<AtomicU64>,
}

/// Display-side end of a [`ChannelSink`]
pub struct DisplayReceiver {
    rx: Receiver<DisplayFrame>,
    dropped: Arc<AtomicU64>,
}

impl ChannelSink {
    /// Create a connected `(sink, receiver)` pair
    pub fn new() -> (Self, DisplayReceiver) {
        let (tx, rx) = bounded(DISPLAY_CHANNEL_CAPACITY);
        let dropped = Arc::new(AtomicU64::new(0));
        (
            Self {
                tx,
                dropped: dropped.clone(),
            },
            DisplayReceiver { rx, dropped },
        )
    }
}

impl DisplaySink for ChannelSink {
    fn push_frame(&mut self, frame: Frame, period: Option<Duration>) {
        match self.tx.try_send(DisplayFrame { frame, period }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

impl DisplayReceiver {
    /// Take every pending frame
    pub fn drain(&self) -> Vec<DisplayFrame> {
        self.rx.try_iter().collect()
    }

    /// Wait up to `timeout` for a frame
    pub fn recv_timeout(&self, timeout: Duration) -> Option<DisplayFrame> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Frames dropped because the display was behind
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

//! Recording handle and the in-memory frame recording
//!
//! The raw artifact (`<project>.raw`) written by [`FrameRecording`] is a
//! small little-endian container:
//!
//! ```text
//! magic    8 bytes  "MSCOPE\0\x01"
//! count    u32      number of frames
//! frames   count x { pts_us: u64, width: u32, height: u32, rgb: width*height*3 bytes }
//! ```

use parking_lot::RwLock;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{MotionScopeError, Result, ResultExt};
use crate::types::Frame;

const RAW_MAGIC: &[u8; 8] = b"MSCOPE\0\x01";

/// Magic plus frame count
const HEADER_LEN: u64 = 12;

/// pts, width and height preceding each frame's pixels
const FRAME_HEADER_LEN: u64 = 16;

/// Handle to a recorded frame sequence.
///
/// `save` and `load` block until the transfer is complete and must never be
/// called on the streaming thread. `progress` may be polled concurrently
/// from another thread while a transfer runs.
pub trait Recording: Send + Sync {
    /// Write the raw artifact
    fn save(&self, path: &Path) -> Result<()>;

    /// Replace the contents with the raw artifact at `path`
    fn load(&self, path: &Path) -> Result<()>;

    /// Progress of the running (or last) transfer, 0..=100
    fn progress(&self) -> u8;

    /// Number of frames
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frame at `index`, if any
    fn frame(&self, index: usize) -> Option<Frame>;
}

/// Shared recording handle as stored in the Project Store.
pub type SharedRecording = Arc<dyn Recording>;

/// A single recorded frame
#[derive(Debug, Clone)]
pub struct RecordedFrame {
    /// Presentation time from the start of the recording
    pub pts: Duration,
    pub image: Frame,
}

/// In-memory recording backed by the raw artifact format above.
#[derive(Debug, Default)]
pub struct FrameRecording {
    frames: RwLock<Vec<RecordedFrame>>,
    progress: AtomicU8,
}

impl FrameRecording {
    /// Create a new empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recording from existing frames
    pub fn from_frames(frames: Vec<RecordedFrame>) -> Self {
        Self {
            frames: RwLock::new(frames),
            progress: AtomicU8::new(0),
        }
    }

    /// Append a frame
    pub fn push(&self, pts: Duration, image: Frame) {
        self.frames.write().push(RecordedFrame { pts, image });
    }

    /// Presentation time of a frame
    pub fn pts(&self, index: usize) -> Option<Duration> {
        self.frames.read().get(index).map(|f| f.pts)
    }

    fn set_progress(&self, done: usize, total: usize) {
        let percent = if total == 0 {
            100
        } else {
            (done * 100 / total).min(100) as u8
        };
        self.progress.store(percent, Ordering::Relaxed);
    }
}

impl Recording for FrameRecording {
    fn save(&self, path: &Path) -> Result<()> {
        self.progress.store(0, Ordering::Relaxed);
        // Snapshot so capture can keep appending while we write
        let frames = self.frames.read().clone();
        let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
        let mut writer = BufWriter::new(file);

        writer.write_all(RAW_MAGIC)?;
        let count = u32::try_from(frames.len())
            .map_err(|_| MotionScopeError::Recording("too many frames".to_string()))?;
        writer.write_all(&count.to_le_bytes())?;

        for (i, frame) in frames.iter().enumerate() {
            let pts_us = u64::try_from(frame.pts.as_micros()).unwrap_or(u64::MAX);
            writer.write_all(&pts_us.to_le_bytes())?;
            writer.write_all(&frame.image.width().to_le_bytes())?;
            writer.write_all(&frame.image.height().to_le_bytes())?;
            writer.write_all(frame.image.as_raw())?;
            self.set_progress(i + 1, frames.len());
        }

        writer.flush()?;
        self.set_progress(frames.len(), frames.len());
        tracing::debug!("Saved {} frames to {:?}", frames.len(), path);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<()> {
        self.progress.store(0, Ordering::Relaxed);
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        let mut remaining = file
            .metadata()
            .with_context(|| format!("Failed to stat {:?}", path))?
            .len();
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 8];
        read_exact(&mut reader, &mut magic)?;
        if &magic != RAW_MAGIC {
            return Err(MotionScopeError::Recording(format!(
                "{:?} is not a raw recording",
                path
            )));
        }
        let count = read_u32(&mut reader)? as usize;
        remaining = remaining.saturating_sub(HEADER_LEN);
        if (count as u64).saturating_mul(FRAME_HEADER_LEN) > remaining {
            return Err(MotionScopeError::Recording(
                "frame count exceeds artifact size".to_string(),
            ));
        }

        let mut frames = Vec::with_capacity(count);
        for i in 0..count {
            remaining = remaining.saturating_sub(FRAME_HEADER_LEN);
            let pts = Duration::from_micros(read_u64(&mut reader)?);
            let width = read_u32(&mut reader)?;
            let height = read_u32(&mut reader)?;
            let len = (width as usize)
                .checked_mul(height as usize)
                .and_then(|n| n.checked_mul(3))
                .ok_or_else(|| {
                    MotionScopeError::Recording(format!("frame {} has invalid dimensions", i))
                })?;
            if len as u64 > remaining {
                return Err(MotionScopeError::Recording(format!(
                    "frame {} is truncated",
                    i
                )));
            }
            remaining -= len as u64;
            let mut pixels = vec![0u8; len];
            read_exact(&mut reader, &mut pixels)?;
            let image = Frame::from_raw(width, height, pixels).ok_or_else(|| {
                MotionScopeError::Recording(format!("frame {} has invalid pixel data", i))
            })?;
            frames.push(RecordedFrame { pts, image });
            self.set_progress(i + 1, count);
        }

        *self.frames.write() = frames;
        self.set_progress(count, count);
        tracing::debug!("Loaded {} frames from {:?}", count, path);
        Ok(())
    }

    fn progress(&self) -> u8 {
        self.progress.load(Ordering::Relaxed)
    }

    fn len(&self) -> usize {
        self.frames.read().len()
    }

    fn frame(&self, index: usize) -> Option<Frame> {
        self.frames.read().get(index).map(|f| f.image.clone())
    }
}

fn read_exact(reader: &mut impl Read, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            MotionScopeError::Recording("raw artifact is truncated".to_string())
        } else {
            MotionScopeError::Io(e)
        }
    })
}

fn read_u32(reader: &mut impl Read) -> Result<u32> {
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64(reader: &mut impl Read) -> Result<u64> {
    let mut buf = [0u8; 8];
    read_exact(reader, &mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

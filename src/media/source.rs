//! Live frame sources

use image::Rgb;
use std::time::{Duration, Instant};

use crate::types::Frame;

/// A live source of frames, such as a camera.
pub trait FrameSource: Send {
    /// Begin producing frames
    fn start(&mut self);

    /// Stop producing frames
    fn stop(&mut self);

    /// Return the next frame if one is ready. Must not block.
    fn try_frame(&mut self) -> Option<Frame>;
}

/// Synthetic source producing a moving bar at a fixed frame rate.
#[derive(Debug)]
pub struct TestPatternSource {
    width: u32,
    height: u32,
    period: Duration,
    running: bool,
    last: Option<Instant>,
    counter: u32,
}

impl TestPatternSource {
    pub fn new(width: u32, height: u32, period: Duration) -> Self {
        Self {
            width,
            height,
            period,
            running: false,
            last: None,
            counter: 0,
        }
    }

    /// Frames produced so far
    pub fn frames_produced(&self) -> u32 {
        self.counter
    }

    fn render(&self) -> Frame {
        let bar = if self.width == 0 {
            0
        } else {
            self.counter % self.width
        };
        Frame::from_fn(self.width, self.height, |x, _| {
            if x == bar {
                Rgb([255, 255, 255])
            } else {
                Rgb([16, 16, 16])
            }
        })
    }
}

impl FrameSource for TestPatternSource {
    fn start(&mut self) {
        self.running = true;
        self.last = None;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn try_frame(&mut self) -> Option<Frame> {
        if !self.running {
            return None;
        }
        let now = Instant::now();
        if let Some(last) = self.last {
            if now.duration_since(last) < self.period {
                return None;
            }
        }
        self.last = Some(now);
        let frame = self.render();
        self.counter = self.counter.wrapping_add(1);
        Some(frame)
    }
}

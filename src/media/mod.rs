//! Media collaborators of the core
//!
//! The core only depends on the traits defined here:
//!
//! - [`Recording`] - recorded frame sequence with blocking save/load
//! - [`Perspective`] - calibration applied to displayed frames
//! - [`DisplaySink`] - receives transformed frames from the streaming loop
//! - [`FrameSource`] - live camera frames
//!
//! Each trait comes with a small implementation so the core runs headless.

pub mod perspective;
pub mod recording;
pub mod sink;
pub mod source;

pub use perspective::{Perspective, PlanarParams, PlanarPerspective, Rotation};
pub use recording::{FrameRecording, RecordedFrame, Recording, SharedRecording};
pub use sink::{ChannelSink, DisplayFrame, DisplayReceiver, DisplaySink};
pub use source::{FrameSource, TestPatternSource};

//! Concrete tabs
//!
//! Thin adapters between the engine and the external collaborators. The
//! image-processing work behind Process and Analyze happens elsewhere; these
//! tabs only track readiness and present frames.

mod analyze;
mod camera;
mod capture;
mod process;

pub use analyze::AnalyzeTab;
pub use camera::CameraTab;
pub use capture::CaptureTab;
pub use process::ProcessTab;

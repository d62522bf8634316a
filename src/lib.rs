//! # MotionScope: project lifecycle and data-sync core
//!
//! The state-management core of a motion-capture review tool. It coordinates
//! a live camera feed, a recorded clip (the "project"), four mutually
//! exclusive tabs and background save/load, while a dedicated real-time
//! thread streams transformed frames to the display.
//!
//! ## Architecture
//!
//! - **Engine**: owns the Project Store, the tabs and the focused tab behind
//!   one lock, and fans store changes out to every tab
//! - **Project**: the lifecycle controller, the on-disk format and the
//!   background save/load worker
//! - **Streaming**: the real-time loop pulling frames from the focused tab
//! - **UI**: mutations pushed over a crossbeam channel to the UI thread,
//!   which is the only place widgets are touched
//!
//! ## Configuration
//!
//! Tunables live in `motionscope.toml` in the platform data directory under
//! `dev.motionscope`, next to the `media/` directory holding the projects.
//!
//! ## Example
//!
//! ```ignore
//! use motionscope::{
//!     config::ScopeConfig,
//!     engine::Engine,
//!     media::{ChannelSink, PlanarPerspective, TestPatternSource},
//!     project::{ProjectController, ProjectFiles},
//!     streaming::Streamer,
//!     tab::registry,
//!     ui::UiBridge,
//! };
//! use std::{sync::Arc, time::Duration};
//!
//! let config = ScopeConfig::load_or_default();
//! let files = ProjectFiles::new(config.media_dir()?);
//! let source = TestPatternSource::new(640, 480, Duration::from_millis(33));
//! let engine = Arc::new(Engine::new(registry::build_tabs(Box::new(source)), config)?);
//! let perspective = Arc::new(PlanarPerspective::new());
//!
//! let (bridge, ui) = UiBridge::new();
//! let mut controller = ProjectController::new(engine.clone(), files, perspective.clone(), ui)?;
//! let (sink, display) = ChannelSink::new();
//! let streamer = Streamer::new(engine, perspective, Box::new(sink)).spawn()?;
//!
//! controller.open("test1")?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod media;
pub mod project;
pub mod store;
pub mod streaming;
pub mod tab;
pub mod tabs;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::ScopeConfig;
pub use engine::{Engine, TickOutcome};
pub use error::{MotionScopeError, Result};
pub use project::{LifecycleState, ProjectController, ProjectFiles, SaveAsStatus};
pub use store::{ChangeSet, ProjectStore, StoreUpdate};
pub use streaming::{Streamer, StreamerHandle};
pub use tab::{Tab, TabContext};
pub use types::{Frame, TabFrame, TabKind};
pub use ui::{UiBridge, UiMutation, UiPusher};

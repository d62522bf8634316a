//! Configuration module for MotionScope
//!
//! This module handles the tunable constants of the core and the
//! platform-appropriate locations of its files.
//!
//! # App Data Location
//!
//! - **Linux**: `~/.local/share/dev.motionscope/`
//! - **macOS**: `~/Library/Application Support/dev.motionscope/`
//! - **Windows**: `%APPDATA%\dev.motionscope\`
//!
//! # Files
//!
//! - `motionscope.toml` - [`ScopeConfig`]
//! - `media/` - project artifacts (`<name>.raw`, `<name>.data`)
//! - `logs/` - rolling log files

use crate::error::{MotionScopeError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application identifier for data directories
pub const APP_ID: &str = "dev.motionscope";

/// Config filename
pub const CONFIG_FILE: &str = "motionscope.toml";

/// Media directory name under the app data directory
pub const MEDIA_DIR: &str = "media";

/// Log directory name under the app data directory
pub const LOG_DIR: &str = "logs";

/// Default minimum frame count before the background model is final
pub const DEFAULT_BG_CNT_FINAL: usize = 30;

/// Default progress polling rate in Hz
pub const DEFAULT_UPDATE_RATE_HZ: u32 = 10;

/// Default capture playback rate in frames per second
pub const DEFAULT_PLAY_RATE_HZ: f64 = 30.0;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        MotionScopeError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create app data directory {:?}", dir))?;
    }

    Ok(dir)
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== Scope Config ====================

/// Tunable constants of the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// A recording must have more frames than this before it can be processed
    pub bg_cnt_final: usize,

    /// Progress polling rate of the save/load worker (Hz)
    pub update_rate_hz: u32,

    /// Playback rate of the capture tab (frames per second)
    pub play_rate_hz: f64,

    /// Idle yield of the streaming loop per tick (microseconds)
    pub stream_idle_us: u64,

    /// Minimum time a progress dialog stays open (milliseconds)
    pub min_dialog_display_ms: u64,

    /// Subtracted from reported recording progress so 100% is only shown
    /// once metadata is written
    pub progress_offset: u8,

    /// Directory holding project artifacts; `None` means `<data dir>/media`
    pub media_dir: Option<PathBuf>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            bg_cnt_final: DEFAULT_BG_CNT_FINAL,
            update_rate_hz: DEFAULT_UPDATE_RATE_HZ,
            play_rate_hz: DEFAULT_PLAY_RATE_HZ,
            stream_idle_us: 1000,
            min_dialog_display_ms: 1000,
            progress_offset: 2,
            media_dir: None,
        }
    }
}

impl ScopeConfig {
    /// Load the config from the default location
    pub fn load() -> Result<Self> {
        let path = config_path().ok_or_else(|| {
            MotionScopeError::Config("Could not determine config path".to_string())
        })?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load the config from an explicit path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("Failed to parse config {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save the config to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(CONFIG_FILE))
    }

    /// Save the config to an explicit path
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config {:?}", path.as_ref()))
    }

    /// Reject values the worker and streaming loop cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.update_rate_hz == 0 {
            return Err(MotionScopeError::Config(
                "update_rate_hz must be greater than zero".to_string(),
            ));
        }
        if !(self.play_rate_hz.is_finite() && self.play_rate_hz > 0.0) {
            return Err(MotionScopeError::Config(
                "play_rate_hz must be a positive number".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolved media directory
    pub fn media_dir(&self) -> Result<PathBuf> {
        match &self.media_dir {
            Some(dir) => Ok(dir.clone()),
            None => app_data_dir().map(|d| d.join(MEDIA_DIR)).ok_or_else(|| {
                MotionScopeError::Config("Could not determine media directory".to_string())
            }),
        }
    }

    /// Interval between progress polls
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.update_rate_hz.max(1) as f64)
    }

    /// Period between frames of capture playback
    pub fn play_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.play_rate_hz)
    }

    /// Streaming loop idle yield
    pub fn stream_idle(&self) -> Duration {
        Duration::from_micros(self.stream_idle_us)
    }

    /// Minimum display duration of a progress dialog
    pub fn min_dialog_display(&self) -> Duration {
        Duration::from_millis(self.min_dialog_display_ms)
    }
}

//! Error handling for MotionScope
//!
//! This module defines the crate error type and a Result alias for use
//! throughout the core.

use thiserror::Error;

use crate::types::TabKind;

/// Main error type for MotionScope operations
#[derive(Error, Debug)]
pub enum MotionScopeError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to project naming or the on-disk catalogue
    #[error("Project error: {0}")]
    Project(String),

    /// Errors related to the raw recording artifact
    #[error("Recording error: {0}")]
    Recording(String),

    /// Navigation to a tab whose entry is disabled
    #[error("Tab {0:?} is not available yet")]
    TabDisabled(TabKind),

    /// A key only the project controller may write
    #[error("Key '{0}' is owned by the project controller")]
    ReservedKey(String),

    /// An operation that needs an open project was requested without one
    #[error("No project is open")]
    NoProject,

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<MotionScopeError>,
    },
}

impl MotionScopeError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        MotionScopeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for MotionScopeError {
    fn from(err: serde_json::Error) -> Self {
        MotionScopeError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for MotionScopeError {
    fn from(err: toml::de::Error) -> Self {
        MotionScopeError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MotionScopeError {
    fn from(err: toml::ser::Error) -> Self {
        MotionScopeError::Config(err.to_string())
    }
}

/// Result type alias for MotionScope operations
pub type Result<T> = std::result::Result<T, MotionScopeError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<MotionScopeError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}

//! Project lifecycle
//!
//! - [`ProjectFiles`] - the on-disk project format in the media directory
//! - [`controller`] - open/save/save-as/close/delete orchestration
//! - [`worker`] - background save/load with progress reporting
//!
//! # On-disk layout
//!
//! Each project `P` is two artifacts in the media directory:
//!
//! - `P.raw` - the recording (optional; absent means nothing recorded yet)
//! - `P.data` - JSON metadata: the store minus `recording` and transient keys
//!
//! A project exists iff `P.data` exists.

pub mod controller;
pub mod worker;

pub use controller::{LifecycleState, ProjectController, SaveAsStatus};
pub use worker::{OperationKind, OperationOutcome, WorkerHandle, WorkerReport};

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{MotionScopeError, Result, ResultExt};

/// Raw recording artifact extension
pub const RAW_EXT: &str = "raw";

/// Metadata artifact extension
pub const DATA_EXT: &str = "data";

/// Catalogue entry for a saved project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectInfo {
    pub name: String,
    /// Whether a raw recording artifact exists
    pub has_recording: bool,
    /// Last modification of the metadata artifact
    pub modified: Option<DateTime<Local>>,
}

/// Check a user-supplied project name and return it trimmed.
///
/// Names become file stems in the media directory, so empty names, path
/// separators and `.`/`..` are refused.
pub fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MotionScopeError::Project(
            "project name must not be empty".to_string(),
        ));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(MotionScopeError::Project(format!(
            "invalid project name {:?}",
            name
        )));
    }
    Ok(name.to_string())
}

/// Project artifacts in one media directory
#[derive(Debug, Clone)]
pub struct ProjectFiles {
    media_dir: PathBuf,
}

impl ProjectFiles {
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_dir: media_dir.into(),
        }
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Create the media directory if it is missing
    pub fn ensure_media_dir(&self) -> Result<()> {
        if !self.media_dir.exists() {
            std::fs::create_dir_all(&self.media_dir).with_context(|| {
                format!("Failed to create media directory {:?}", self.media_dir)
            })?;
            tracing::info!("Created media directory {:?}", self.media_dir);
        }
        Ok(())
    }

    pub fn raw_path(&self, name: &str) -> PathBuf {
        self.media_dir.join(format!("{}.{}", name, RAW_EXT))
    }

    pub fn data_path(&self, name: &str) -> PathBuf {
        self.media_dir.join(format!("{}.{}", name, DATA_EXT))
    }

    /// Whether a project of this name exists
    pub fn exists(&self, name: &str) -> bool {
        self.data_path(name).is_file()
    }

    /// Whether the project has a raw recording artifact
    pub fn has_recording(&self, name: &str) -> bool {
        self.raw_path(name).is_file()
    }

    /// Saved projects, sorted by name
    pub fn list_projects(&self) -> Result<Vec<ProjectInfo>> {
        let entries = std::fs::read_dir(&self.media_dir)
            .with_context(|| format!("Failed to read media directory {:?}", self.media_dir))?;

        let mut projects = BTreeMap::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DATA_EXT) || !path.is_file() {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let modified = std::fs::metadata(&path)
                .and_then(|m| m.modified())
                .ok()
                .map(DateTime::<Local>::from);
            projects.insert(
                name.to_string(),
                ProjectInfo {
                    name: name.to_string(),
                    has_recording: self.has_recording(name),
                    modified,
                },
            );
        }

        Ok(projects.into_values().collect())
    }

    /// Names of saved projects; an unreadable directory lists nothing
    pub fn project_names(&self) -> Vec<String> {
        match self.list_projects() {
            Ok(projects) => projects.into_iter().map(|p| p.name).collect(),
            Err(e) => {
                tracing::warn!("Failed to list projects: {}", e);
                Vec::new()
            }
        }
    }

    /// Write the metadata artifact
    pub fn write_metadata(&self, name: &str, metadata: &Map<String, Value>) -> Result<()> {
        let path = self.data_path(name);
        let json = serde_json::to_string_pretty(metadata)?;
        std::fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))
    }

    /// Read the metadata artifact; `None` when the project has none
    pub fn read_metadata(&self, name: &str) -> Result<Option<Map<String, Value>>> {
        let path = self.data_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let json =
            std::fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        let value: Value =
            serde_json::from_str(&json).with_context(|| format!("Failed to parse {:?}", path))?;
        match value {
            Value::Object(map) => Ok(Some(map)),
            other => Err(MotionScopeError::Serialization(format!(
                "{:?} holds {} instead of an object",
                path,
                json_kind(&other)
            ))),
        }
    }

    /// Remove both artifacts. The raw artifact may be absent.
    pub fn delete(&self, name: &str) -> Result<()> {
        let data = self.data_path(name);
        std::fs::remove_file(&data).with_context(|| format!("Failed to delete {:?}", data))?;
        self.remove_recording(name)?;
        tracing::info!("Deleted project {}", name);
        Ok(())
    }

    /// Remove the raw artifact if there is one
    pub fn remove_recording(&self, name: &str) -> Result<()> {
        let raw = self.raw_path(name);
        match std::fs::remove_file(&raw) {
            Ok(()) => {
                tracing::debug!("Removed recording {:?}", raw);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(MotionScopeError::from(e).with_context(format!("Failed to delete {:?}", raw)))
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn files() -> (tempfile::TempDir, ProjectFiles) {
        let dir = tempfile::tempdir().unwrap();
        let files = ProjectFiles::new(dir.path().join("media"));
        files.ensure_media_dir().unwrap();
        (dir, files)
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  test1 ").unwrap(), "test1");
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("run.2").is_ok());
    }

    #[test]
    fn test_project_exists_iff_metadata_exists() {
        let (_dir, files) = files();
        std::fs::write(files.raw_path("orphan"), b"x").unwrap();
        assert!(!files.exists("orphan"));

        files.write_metadata("test1", &Map::new()).unwrap();
        assert!(files.exists("test1"));
        assert!(!files.has_recording("test1"));
    }

    #[test]
    fn test_list_projects_sorted_and_filtered() {
        let (_dir, files) = files();
        files.write_metadata("zeta", &Map::new()).unwrap();
        files.write_metadata("alpha", &Map::new()).unwrap();
        std::fs::write(files.raw_path("alpha"), b"x").unwrap();
        std::fs::write(files.raw_path("orphan"), b"x").unwrap();
        std::fs::write(files.media_dir().join("notes.txt"), b"x").unwrap();

        let projects = files.list_projects().unwrap();
        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert!(projects[0].has_recording);
        assert!(!projects[1].has_recording);
        assert!(projects[0].modified.is_some());
    }

    #[test]
    fn test_metadata_roundtrip_and_missing() {
        let (_dir, files) = files();
        assert_eq!(files.read_metadata("nothing").unwrap(), None);

        let Value::Object(meta) = json!({"project": "p", "obj_data": {"1": [[0, 2]]}}) else {
            unreachable!()
        };
        files.write_metadata("p", &meta).unwrap();
        assert_eq!(files.read_metadata("p").unwrap(), Some(meta));
    }

    #[test]
    fn test_non_object_metadata_rejected() {
        let (_dir, files) = files();
        std::fs::write(files.data_path("bad"), "[1, 2]").unwrap();
        let err = files.read_metadata("bad").unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_delete_without_raw() {
        let (_dir, files) = files();
        files.write_metadata("p", &Map::new()).unwrap();
        files.delete("p").unwrap();
        assert!(!files.exists("p"));
        assert!(files.delete("p").is_err());
    }

    #[test]
    fn test_remove_recording_tolerates_missing_raw() {
        let (_dir, files) = files();
        std::fs::write(files.raw_path("p"), b"x").unwrap();
        files.remove_recording("p").unwrap();
        assert!(!files.has_recording("p"));
        files.remove_recording("p").unwrap();
    }
}

//! Shared Project Store
//!
//! The store holds the state of the open project as a keyed map. JSON
//! values live in one map; the recording handle lives beside it because it
//! is never serialized. Only the crate can write to the store: tabs receive
//! `&ProjectStore` and report their derived keys through
//! [`Engine::commit`](crate::engine::Engine::commit).
//!
//! - [`keys`] - well-known key names
//! - [`merge`] - recursive merge used when loading metadata

pub mod keys;
pub mod merge;

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::media::SharedRecording;

/// Keyed state of the open project.
#[derive(Default)]
pub struct ProjectStore {
    values: Map<String, Value>,
    recording: Option<SharedRecording>,
}

impl std::fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectStore")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .field("recording_len", &self.recording_len())
            .finish()
    }
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a JSON value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether a key is present (the recording counts only when set)
    pub fn contains(&self, key: &str) -> bool {
        if key == keys::RECORDING {
            self.recording.is_some()
        } else {
            self.values.contains_key(key)
        }
    }

    /// Name of the open project
    pub fn project(&self) -> Option<&str> {
        self.values.get(keys::PROJECT).and_then(Value::as_str)
    }

    /// The active recording
    pub fn recording(&self) -> Option<&SharedRecording> {
        self.recording.as_ref()
    }

    /// Frame count of the active recording, zero without one
    pub fn recording_len(&self) -> usize {
        self.recording.as_ref().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether object data is present and non-empty
    pub fn has_obj_data(&self) -> bool {
        self.values.get(keys::OBJ_DATA).is_some_and(is_truthy)
    }

    /// All present keys, the recording included when set
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values
            .keys()
            .map(String::as_str)
            .chain(self.recording.as_ref().map(|_| keys::RECORDING))
    }

    /// The serializable part of the store: everything except the recording
    /// and transient buffers
    pub fn metadata(&self) -> Map<String, Value> {
        self.values
            .iter()
            .filter(|(k, _)| !keys::is_transient(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub(crate) fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub(crate) fn set_recording(&mut self, recording: Option<SharedRecording>) {
        self.recording = recording;
    }

    /// Drop every key and the recording
    pub(crate) fn clear(&mut self) {
        self.values.clear();
        self.recording = None;
    }

    /// Deep-merge a metadata map, returning the top-level keys it touched
    pub(crate) fn merge(&mut self, incoming: Map<String, Value>) -> ChangeSet {
        let changed: ChangeSet = incoming.keys().cloned().collect();
        merge::merge_maps(&mut self.values, incoming);
        changed
    }

    /// Apply a batch of writes, returning the keys it touched
    pub(crate) fn apply(&mut self, update: StoreUpdate) -> ChangeSet {
        let mut changed = ChangeSet::new();
        for (key, op) in update.ops {
            match op {
                UpdateOp::Set(value) => self.set(key.clone(), value),
                UpdateOp::Remove => {
                    self.remove(&key);
                }
            }
            changed.insert(key);
        }
        changed
    }
}

/// Python-style truthiness of a JSON value: `null`, `false`, zero and empty
/// strings/arrays/objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

// ==================== Change Set ====================

/// Names of the store keys affected by a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    keys: BTreeSet<String>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A change set naming a single key
    pub fn single(key: impl Into<String>) -> Self {
        let mut changed = Self::new();
        changed.insert(key);
        changed
    }

    pub fn insert(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Merge another change set into this one
    pub fn extend(&mut self, other: ChangeSet) {
        self.keys.extend(other.keys);
    }
}

impl<S: Into<String>> FromIterator<S> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&str> = self.iter().collect();
        write!(f, "[{}]", keys.join(", "))
    }
}

// ==================== Store Update ====================

#[derive(Debug, Clone)]
enum UpdateOp {
    Set(Value),
    Remove,
}

/// A batch of writes to derived keys, committed through the engine.
#[derive(Debug, Clone, Default)]
pub struct StoreUpdate {
    ops: Vec<(String, UpdateOp)>,
}

impl StoreUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key to a value
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push((key.into(), UpdateOp::Set(value.into())));
        self
    }

    /// Remove a key
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.ops.push((key.into(), UpdateOp::Remove));
        self
    }

    /// Keys this update writes
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

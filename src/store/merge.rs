//! Recursive structural merge used when applying a metadata artifact
//!
//! Policy:
//! - object into object: merge key by key, recursing into each value
//! - anything else (including an object meeting a non-object, `null`, arrays):
//!   the incoming value replaces the existing one
//!
//! Arrays are leaves. They are replaced wholesale, never concatenated.

use serde_json::{Map, Value};

/// Merge `incoming` into `target` in place.
pub fn deep_merge(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(existing), Value::Object(incoming)) => {
            merge_maps(existing, incoming);
        }
        (target, incoming) => *target = incoming,
    }
}

/// Merge every entry of `incoming` into `target`.
pub fn merge_maps(target: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        match target.get_mut(&key) {
            Some(existing) => deep_merge(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}

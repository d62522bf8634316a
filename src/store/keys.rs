//! Well-known Project Store keys

/// Active project name
pub const PROJECT: &str = "project";

/// Handle to the active recording (never serialized)
pub const RECORDING: &str = "recording";

/// Derived tracking/analysis results
pub const OBJ_DATA: &str = "obj_data";

/// Perspective calibration parameters
pub const PERSPECTIVE: &str = "Perspective";

/// Background model buffer (transient, never serialized)
pub const BG: &str = "bg";

/// Keys only the project controller may write
pub const RESERVED: [&str; 2] = [PROJECT, RECORDING];

/// Keys excluded from the metadata artifact besides `recording`
pub const TRANSIENT: [&str; 1] = [BG];

/// Whether a key is excluded from the metadata artifact
pub fn is_transient(key: &str) -> bool {
    key == RECORDING || TRANSIENT.contains(&key)
}

/// Whether a key is owned by the project controller
pub fn is_reserved(key: &str) -> bool {
    RESERVED.contains(&key)
}

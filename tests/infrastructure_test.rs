//! Test to verify test infrastructure works correctly

mod common;

use common::builders::{HarnessBuilder, RecordingBuilder};
use common::mock_helpers::{EventLog, ScriptedTab, TabEvent};
use motionscope::{media::Recording, types::TabKind, LifecycleState};
use std::time::Duration;

#[test]
fn test_infrastructure_setup() {
    // Test that builders work
    let recording = RecordingBuilder::new().frames(3).build();
    assert_eq!(recording.len(), 3);

    let h = HarnessBuilder::new().build();
    assert!(h.files().media_dir().starts_with(h.dir.path()));
    assert_eq!(h.controller.state(), LifecycleState::NoProject);
}

#[test]
fn test_event_log_is_shared() {
    let log = EventLog::default();
    let _tab = ScriptedTab::new(TabKind::Capture, log.clone());
    log.push(TabEvent::Reset(TabKind::Capture));
    assert_eq!(log.take(), vec![TabEvent::Reset(TabKind::Capture)]);
    assert!(log.take().is_empty());
}

#[test]
fn test_wait_until() {
    assert!(common::wait_until(Duration::from_millis(10), || true));
    assert!(!common::wait_until(Duration::from_millis(5), || false));
}

#[test]
#[should_panic]
fn test_json_map_rejects_arrays() {
    common::json_map(serde_json::json!([1, 2]));
}

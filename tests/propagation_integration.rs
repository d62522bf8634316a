//! Integration tests for change propagation and tab navigation
//!
//! These tests drive the engine with scripted tabs to validate:
//! - Fan-out order and change sets
//! - Cross-cutting gating rules for Process and Analyze
//! - Focus changes and their mutations

mod common;

use common::builders::{HarnessBuilder, RecordingBuilder};
use common::mock_helpers::{scripted_tabs, EventLog, TabEvent};
use motionscope::{
    config::ScopeConfig,
    engine::Engine,
    error::MotionScopeError,
    store::{keys, ChangeSet, StoreUpdate},
    types::TabKind,
    ui::UiMutation,
};
use proptest::prelude::*;
use serde_json::json;

fn engine_with_log(bg_cnt_final: usize) -> (Engine, EventLog) {
    let log = EventLog::default();
    let config = ScopeConfig {
        bg_cnt_final,
        ..Default::default()
    };
    let engine = Engine::new(scripted_tabs(&log), config).unwrap();
    (engine, log)
}

#[test]
fn test_fan_out_reaches_every_tab_in_order() {
    let (engine, log) = engine_with_log(30);
    let changed: ChangeSet = ["custom", "other"].into_iter().collect();
    engine.data_update(&changed);

    let events = log.take();
    let tabs: Vec<TabKind> = events
        .iter()
        .map(|e| match e {
            TabEvent::DataUpdate { tab, keys, origin } => {
                assert_eq!(keys, &vec!["custom".to_string(), "other".to_string()]);
                assert_eq!(*origin, None);
                *tab
            }
            other => panic!("unexpected event {:?}", other),
        })
        .collect();
    assert_eq!(tabs, TabKind::ALL.to_vec());
}

#[test]
fn test_empty_change_set_is_not_propagated() {
    let (engine, log) = engine_with_log(30);
    assert!(engine.data_update(&ChangeSet::new()).is_empty());
    assert!(log.take().is_empty());
}

#[test]
fn test_commit_carries_origin() {
    let (engine, log) = engine_with_log(30);
    engine
        .commit(StoreUpdate::new().set(keys::BG, json!([0])), TabKind::Process)
        .unwrap();
    assert!(log.take().iter().all(|e| matches!(
        e,
        TabEvent::DataUpdate {
            origin: Some(TabKind::Process),
            ..
        }
    )));
}

#[test]
fn test_reserved_keys_cannot_be_committed() {
    let (engine, log) = engine_with_log(30);
    let err = engine
        .commit(
            StoreUpdate::new().set("fine", 1).set(keys::RECORDING, json!(null)),
            TabKind::Capture,
        )
        .unwrap_err();
    assert!(matches!(err, MotionScopeError::ReservedKey(ref k) if k == keys::RECORDING));
    assert!(log.take().is_empty());
    assert!(!engine.with_store(|s| s.contains("fine")));
}

#[test]
fn test_analyze_follows_obj_data() {
    let (engine, log) = engine_with_log(2);
    engine.select_tab(TabKind::Capture).unwrap();
    log.take();

    let mods = engine
        .commit(
            StoreUpdate::new().set(keys::OBJ_DATA, json!({"3": [[0, 0]]})),
            TabKind::Process,
        )
        .unwrap();
    assert!(engine.is_tab_enabled(TabKind::Analyze));
    assert_eq!(engine.focused_tab(), TabKind::Analyze);

    // Every tab's panel and navigation entry is updated, then the tabs are told
    let panels: Vec<&UiMutation> = mods
        .iter()
        .filter(|m| matches!(m, UiMutation::TabPanelOpen { .. }))
        .collect();
    assert_eq!(panels.len(), TabKind::ALL.len());
    assert!(mods.contains(&UiMutation::TabPanelOpen {
        tab: TabKind::Analyze,
        open: true
    }));
    let events = log.take();
    assert!(events.contains(&TabEvent::Focus(TabKind::Capture, false)));
    assert_eq!(events.last(), Some(&TabEvent::Focus(TabKind::Analyze, true)));

    engine
        .commit(StoreUpdate::new().remove(keys::OBJ_DATA), TabKind::Process)
        .unwrap();
    assert!(!engine.is_tab_enabled(TabKind::Analyze));
    assert_eq!(engine.focused_tab(), TabKind::Camera);
    assert!(matches!(
        engine.select_tab(TabKind::Analyze),
        Err(MotionScopeError::TabDisabled(TabKind::Analyze))
    ));
}

#[test]
fn test_close_resets_tabs_then_refocuses_camera() {
    let log = EventLog::default();
    let mut h = HarnessBuilder::new().tabs(scripted_tabs(&log)).build();
    h.engine.select_tab(TabKind::Capture).unwrap();
    log.take();
    h.bridge.drain();

    h.controller.close();
    let events = log.take();
    assert_eq!(
        &events[..4],
        &[
            TabEvent::Reset(TabKind::Camera),
            TabEvent::Reset(TabKind::Capture),
            TabEvent::Reset(TabKind::Process),
            TabEvent::Reset(TabKind::Analyze),
        ]
    );
    assert_eq!(
        &events[4..],
        &[
            TabEvent::Focus(TabKind::Capture, false),
            TabEvent::Focus(TabKind::Camera, true),
        ]
    );

    let mods = h.bridge.drain();
    assert!(mods.contains(&UiMutation::NavEnabled {
        tab: TabKind::Process,
        enabled: false
    }));
    assert!(mods.contains(&UiMutation::PerspectiveEnabled(false)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_process_enabled_iff_recording_exceeds_threshold(
        threshold in 0usize..40,
        frames in 0usize..60,
    ) {
        let mut h = HarnessBuilder::new().bg_cnt_final(threshold).build();
        h.controller
            .install_recording(RecordingBuilder::new().frames(frames).size(1, 1).build());
        prop_assert_eq!(h.engine.is_tab_enabled(TabKind::Process), frames > threshold);
    }
}

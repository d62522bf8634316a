//! Analyze tab: object data summary and graph refresh

use serde_json::Value;

use crate::store::{keys, ChangeSet};
use crate::tab::{Tab, TabContext};
use crate::types::TabKind;
use crate::ui::UiMutation;

/// Tracks how many objects the processed data holds and asks the graphs to
/// redraw when it changes.
#[derive(Debug, Default)]
pub struct AnalyzeTab {
    objects: usize,
    focused: bool,
}

impl AnalyzeTab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_count(&self) -> usize {
        self.objects
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

fn count_objects(value: Option<&Value>) -> usize {
    match value {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Object(map)) => map.len(),
        _ => 0,
    }
}

impl Tab for AnalyzeTab {
    fn kind(&self) -> TabKind {
        TabKind::Analyze
    }

    fn reset(&mut self) -> Vec<UiMutation> {
        self.objects = 0;
        vec![UiMutation::property("analyze", "object_count", 0)]
    }

    fn focus(&mut self, enter: bool, _ctx: &TabContext<'_>) -> Vec<UiMutation> {
        self.focused = enter;
        Vec::new()
    }

    fn data_update(&mut self, changed: &ChangeSet, ctx: &TabContext<'_>) -> Vec<UiMutation> {
        if !changed.contains(keys::OBJ_DATA) {
            return Vec::new();
        }
        self.objects = count_objects(ctx.store.get(keys::OBJ_DATA));
        vec![
            UiMutation::property("analyze", "object_count", self.objects),
            UiMutation::RedrawGraphs,
        ]
    }
}

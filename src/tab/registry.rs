//! Tab registry - the fixed tab set in navigation order.

use crate::error::{MotionScopeError, Result};
use crate::media::FrameSource;
use crate::tab::Tab;
use crate::tabs::{AnalyzeTab, CameraTab, CaptureTab, ProcessTab};
use crate::types::TabKind;

/// Build the standard tab set around a live frame source.
pub fn build_tabs(camera: Box<dyn FrameSource>) -> Vec<Box<dyn Tab>> {
    vec![
        Box::new(CameraTab::new(camera)),
        Box::new(CaptureTab::new()),
        Box::new(ProcessTab::new()),
        Box::new(AnalyzeTab::new()),
    ]
}

/// Check that a tab set is usable by the engine: non-empty, every kind at
/// most once, and the Camera tab present (it receives focus on reset).
pub fn validate_tabs(tabs: &[Box<dyn Tab>]) -> Result<()> {
    let mut seen = Vec::with_capacity(tabs.len());
    for tab in tabs {
        let kind = tab.kind();
        if seen.contains(&kind) {
            return Err(MotionScopeError::Config(format!(
                "tab {} registered twice",
                kind
            )));
        }
        seen.push(kind);
    }
    if !seen.contains(&TabKind::Camera) {
        return Err(MotionScopeError::Config(
            "tab set must contain the Camera tab".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::TestPatternSource;
    use std::time::Duration;

    fn source() -> Box<dyn FrameSource> {
        Box::new(TestPatternSource::new(4, 4, Duration::ZERO))
    }

    #[test]
    fn test_default_tabs_in_navigation_order() {
        let tabs = build_tabs(source());
        let kinds: Vec<TabKind> = tabs.iter().map(|t| t.kind()).collect();
        assert_eq!(kinds, TabKind::ALL.to_vec());
        assert!(validate_tabs(&tabs).is_ok());
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let mut tabs = build_tabs(source());
        tabs.push(Box::new(ProcessTab::new()));
        assert!(validate_tabs(&tabs).is_err());
    }

    #[test]
    fn test_camera_required() {
        let tabs: Vec<Box<dyn Tab>> = vec![Box::new(AnalyzeTab::new())];
        assert!(validate_tabs(&tabs).is_err());
    }
}

//! Perspective transform applied between the focused tab and the display

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Frame;
use crate::ui::UiMutation;

/// Geometric calibration applied to every displayed frame.
///
/// `transform` runs on the streaming thread outside the shared lock, so
/// implementations keep their own synchronization.
pub trait Perspective: Send + Sync {
    /// Apply the calibration to a frame
    fn transform(&self, frame: Frame) -> Frame;

    /// Current calibration as a serializable value
    fn get_params(&self) -> Value;

    /// Apply calibration parameters, returning the control updates
    fn set_params(&self, params: &Value) -> Vec<UiMutation>;

    /// Return to the default calibration
    fn out_reset(&self) -> Vec<UiMutation>;

    /// Enable or disable the calibration
    fn out_enable(&self, enable: bool) -> Vec<UiMutation>;
}

/// Quarter-turn rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

/// Parameters of [`PlanarPerspective`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanarParams {
    pub enabled: bool,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub rotation: Rotation,
}

/// Flip/rotate calibration.
#[derive(Debug, Default)]
pub struct PlanarPerspective {
    params: RwLock<PlanarParams>,
}

impl PlanarPerspective {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> PlanarParams {
        self.params.read().clone()
    }

    fn mutations(params: &PlanarParams) -> Vec<UiMutation> {
        vec![
            UiMutation::PerspectiveParams(serde_json::to_value(params).unwrap_or(Value::Null)),
            UiMutation::PerspectiveEnabled(params.enabled),
        ]
    }
}

impl Perspective for PlanarPerspective {
    fn transform(&self, frame: Frame) -> Frame {
        let params = self.params.read().clone();
        if !params.enabled {
            return frame;
        }

        let mut frame = frame;
        if params.flip_horizontal {
            frame = image::imageops::flip_horizontal(&frame);
        }
        if params.flip_vertical {
            frame = image::imageops::flip_vertical(&frame);
        }
        match params.rotation {
            Rotation::None => frame,
            Rotation::Cw90 => image::imageops::rotate90(&frame),
            Rotation::Cw180 => image::imageops::rotate180(&frame),
            Rotation::Cw270 => image::imageops::rotate270(&frame),
        }
    }

    fn get_params(&self) -> Value {
        serde_json::to_value(&*self.params.read()).unwrap_or(Value::Null)
    }

    fn set_params(&self, params: &Value) -> Vec<UiMutation> {
        match serde_json::from_value::<PlanarParams>(params.clone()) {
            Ok(parsed) => {
                let mods = Self::mutations(&parsed);
                *self.params.write() = parsed;
                mods
            }
            Err(e) => {
                tracing::warn!("Ignoring invalid perspective parameters: {}", e);
                Vec::new()
            }
        }
    }

    fn out_reset(&self) -> Vec<UiMutation> {
        let mut params = self.params.write();
        // Calibration resets, the enable switch is left to out_enable
        let enabled = params.enabled;
        *params = PlanarParams {
            enabled,
            ..Default::default()
        };
        Self::mutations(&params)
    }

    fn out_enable(&self, enable: bool) -> Vec<UiMutation> {
        self.params.write().enabled = enable;
        vec![UiMutation::PerspectiveEnabled(enable)]
    }
}

use serde::Deserialize;

use crate::FieldError;
use crate::field::FIELD_CONSTANT;

/// Tunables of the hazard model.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct FieldParams {
    /// Field magnitude (V/m) below which a cell counts as "no appreciable signal".
    #[serde(default = "default_detection_threshold")]
    pub detection_threshold: f64,
    /// Widening factor applied to the threshold distance when pruning.
    #[serde(default = "default_pruning_margin")]
    pub pruning_margin: f64,
}

fn default_detection_threshold() -> f64 {
    10.0
}
fn default_pruning_margin() -> f64 {
    1.1
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            detection_threshold: default_detection_threshold(),
            pruning_margin: default_pruning_margin(),
        }
    }
}

impl FieldParams {
    pub fn validate(&self) -> Result<(), FieldError> {
        let checks = [
            ("detection_threshold", self.detection_threshold),
            ("pruning_margin", self.pruning_margin),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(FieldError::InvalidParams { name, value });
            }
        }
        Ok(())
    }

    /// Distance (m) past which an unobstructed source of `power` watts stays under the threshold,
    /// widened by the pruning margin. With the defaults this is `1.1 * sqrt(0.3 * P)`.
    #[inline]
    pub fn influence_radius(&self, power: f64) -> f64 {
        self.pruning_margin * (FIELD_CONSTANT * power).sqrt() / self.detection_threshold
    }
}

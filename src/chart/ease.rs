//! Easing curves for transitions
//!
//! An easing curve maps normalized time `t` (0.0 to 1.0) to normalized
//! progress. Input is clamped, so callers can pass raw elapsed fractions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// v(t) = t
    Linear,
    /// Quadratic in-out: t² up to the midpoint, mirrored after it
    QuadInOut,
    /// Cubic in-out, the browser default for unnamed transitions
    #[default]
    CubicInOut,
}

impl Ease {
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t / 2.0
                } else {
                    let t = t - 1.0;
                    (t * (2.0 - t) + 1.0) / 2.0
                }
            }
            Ease::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

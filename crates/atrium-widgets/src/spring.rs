//! Damped spring used to smooth pointer-driven values.
//!
//! Integrated frame by frame (semi-implicit Euler) rather than solved
//! analytically, because targets change on almost every pointer event.
//! Large frame gaps are split into fixed sub-steps so a tab that was in the
//! background does not make the spring explode when it resumes.
//!
//! | Preset | stiffness | damping | mass |
//! |--------|-----------|---------|------|
//! | `DEFAULT` | 100 | 10 | 1 |
//! | `GENTLE`  | 60  | 14 | 1 |
//! | `SNAPPY`  | 300 | 30 | 1 |

use serde::Deserialize;

use crate::error::{WidgetError, require_positive};

/// Longest interval integrated in one sub-step, in seconds.
const MAX_SUBSTEP: f32 = 1.0 / 120.0;

/// Upper bound on the frame gap honoured by [`Spring::step`], in seconds.
const MAX_FRAME_GAP: f32 = 0.25;

/// Default settle tolerance for position and velocity.
pub const SETTLE_EPSILON: f32 = 0.01;

/// Spring physical parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub const DEFAULT: Self = Self {
        stiffness: 100.0,
        damping: 10.0,
        mass: 1.0,
    };

    pub const GENTLE: Self = Self {
        stiffness: 60.0,
        damping: 14.0,
        mass: 1.0,
    };

    pub const SNAPPY: Self = Self {
        stiffness: 300.0,
        damping: 30.0,
        mass: 1.0,
    };

    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidProp`] if any parameter is not a finite
    /// positive number.
    pub fn validate(&self) -> Result<(), WidgetError> {
        require_positive("spring.stiffness", self.stiffness)?;
        require_positive("spring.damping", self.damping)?;
        require_positive("spring.mass", self.mass)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A single animated scalar chasing a target.
#[derive(Debug, Clone)]
pub struct Spring {
    config: SpringConfig,
    position: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// Create a spring resting at `value`.
    #[must_use]
    pub fn new(value: f32, config: SpringConfig) -> Self {
        Self {
            config,
            position: value,
            velocity: 0.0,
            target: value,
        }
    }

    #[must_use]
    pub fn position(&self) -> f32 {
        self.position
    }

    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Jump to `value` and stop.
    pub fn snap(&mut self, value: f32) {
        self.position = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let mut remaining = dt.min(MAX_FRAME_GAP);
        while remaining > 0.0 {
            let h = remaining.min(MAX_SUBSTEP);
            let displacement = self.position - self.target;
            let force = -self.config.stiffness * displacement - self.config.damping * self.velocity;
            self.velocity += force / self.config.mass * h;
            self.position += self.velocity * h;
            remaining -= h;
        }
    }

    /// Whether both the distance to target and the velocity are below
    /// `epsilon`.
    #[must_use]
    pub fn is_settled(&self, epsilon: f32) -> bool {
        (self.position - self.target).abs() < epsilon && self.velocity.abs() < epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_settled(spring: &mut Spring) -> usize {
        let mut frames = 0;
        while !spring.is_settled(SETTLE_EPSILON) && frames < 10_000 {
            spring.step(1.0 / 60.0);
            frames += 1;
        }
        frames
    }

    #[test]
    fn converges_to_target() {
        let mut spring = Spring::new(0.0, SpringConfig::DEFAULT);
        spring.set_target(10.0);
        let frames = run_until_settled(&mut spring);
        assert!(frames < 10_000, "spring never settled");
        assert!((spring.position() - 10.0).abs() < SETTLE_EPSILON);
    }

    #[test]
    fn huge_frame_gap_stays_bounded() {
        let mut spring = Spring::new(0.0, SpringConfig::SNAPPY);
        spring.set_target(1.0);
        spring.step(30.0);
        assert!(spring.position().is_finite());
        assert!(spring.position().abs() < 5.0);
    }

    #[test]
    fn snap_stops_motion() {
        let mut spring = Spring::new(0.0, SpringConfig::DEFAULT);
        spring.set_target(50.0);
        spring.step(0.05);
        spring.snap(3.0);
        assert_eq!(spring.position(), 3.0);
        assert_eq!(spring.velocity(), 0.0);
        assert!(spring.is_settled(SETTLE_EPSILON));
    }

    #[test]
    fn non_finite_target_is_ignored() {
        let mut spring = Spring::new(2.0, SpringConfig::DEFAULT);
        spring.set_target(f32::NAN);
        assert_eq!(spring.target(), 2.0);
    }

    #[test]
    fn config_from_partial_json_uses_defaults() {
        let cfg: SpringConfig = serde_json::from_str(r#"{"stiffness": 250.0}"#).unwrap_or_default();
        assert_eq!(cfg.stiffness, 250.0);
        assert_eq!(cfg.damping, SpringConfig::DEFAULT.damping);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_mass_is_rejected() {
        let cfg = SpringConfig {
            mass: 0.0,
            ..SpringConfig::DEFAULT
        };
        assert!(cfg.validate().is_err());
    }
}

//! Parallax logo.
//!
//! The logo leans toward the pointer while its element is on screen. Pointer
//! offset from the element centre (normalized to `±1`) drives four springs:
//! rotation about both axes and translation along both axes, each clamped to
//! its configured maximum.
//!
//! ```text
//!            enter view                 pointer enter
//!  Dormant ─────────────▶ Idle ────────────────────────▶ Tracking
//!     ▲                    ▲                                │
//!     │ leave view         │ springs settled                │ pointer leave
//!     │ (snap to neutral)  └────────── Settling ◀───────────┘
//!     └────────────── from any state
//! ```

use serde::Deserialize;
use tracing::debug;

use crate::error::{WidgetError, require_positive};
use crate::frame::FrameThrottle;
use crate::geometry::{Point, Rect};
use crate::spring::{SETTLE_EPSILON, Spring, SpringConfig};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParallaxProps {
    pub max_rotation_deg: f32,
    pub max_translate_px: f32,
    pub spring: SpringConfig,
}

impl Default for ParallaxProps {
    fn default() -> Self {
        Self {
            max_rotation_deg: 15.0,
            max_translate_px: 12.0,
            spring: SpringConfig::GENTLE,
        }
    }
}

impl ParallaxProps {
    /// # Errors
    ///
    /// Returns [`WidgetError::InvalidProp`] for non-positive limits or an
    /// invalid spring.
    pub fn validate(&self) -> Result<(), WidgetError> {
        require_positive("max_rotation_deg", self.max_rotation_deg)?;
        require_positive("max_translate_px", self.max_translate_px)?;
        self.spring.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallaxPhase {
    /// Element is not intersecting the viewport; pointer input is ignored.
    Dormant,
    /// In view, at the neutral pose.
    Idle,
    /// Following the pointer.
    Tracking,
    /// Returning to the neutral pose.
    Settling,
    TornDown,
}

/// Transform to apply to the logo.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub rotate_x_deg: f32,
    pub rotate_y_deg: f32,
    pub translate_x_px: f32,
    pub translate_y_px: f32,
}

#[derive(Debug)]
pub struct ParallaxLogo {
    props: ParallaxProps,
    phase: ParallaxPhase,
    bounds: Option<Rect>,
    rotate_x: Spring,
    rotate_y: Spring,
    translate_x: Spring,
    translate_y: Spring,
    frame: FrameThrottle,
}

impl ParallaxLogo {
    /// # Errors
    ///
    /// Returns [`WidgetError`] if the props are invalid.
    pub fn new(props: ParallaxProps) -> Result<Self, WidgetError> {
        props.validate()?;
        let spring = |v| Spring::new(v, props.spring);
        Ok(Self {
            props,
            phase: ParallaxPhase::Dormant,
            bounds: None,
            rotate_x: spring(0.0),
            rotate_y: spring(0.0),
            translate_x: spring(0.0),
            translate_y: spring(0.0),
            frame: FrameThrottle::new(),
        })
    }

    #[must_use]
    pub fn phase(&self) -> ParallaxPhase {
        self.phase
    }

    /// Viewport intersection changed.
    ///
    /// Leaving view snaps back to the neutral pose immediately; there is no
    /// point animating a logo nobody can see.
    pub fn set_intersecting(&mut self, in_view: bool) {
        match (self.phase, in_view) {
            (ParallaxPhase::TornDown, _) => {}
            (ParallaxPhase::Dormant, true) => self.transition(ParallaxPhase::Idle),
            (ParallaxPhase::Dormant, false) | (_, true) => {}
            (_, false) => {
                self.bounds = None;
                self.snap_neutral();
                self.transition(ParallaxPhase::Dormant);
            }
        }
    }

    /// Pointer entered the element. `bounds` is its current bounding box.
    pub fn pointer_enter(&mut self, bounds: Rect) {
        if matches!(
            self.phase,
            ParallaxPhase::Idle | ParallaxPhase::Settling | ParallaxPhase::Tracking
        ) {
            self.bounds = Some(bounds);
            self.transition(ParallaxPhase::Tracking);
        }
    }

    /// Pointer moved. Returns `true` when the host must schedule a frame.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        if self.phase != ParallaxPhase::Tracking {
            return false;
        }
        let Some(bounds) = self.bounds else {
            return false;
        };
        let offset = bounds.offset_from_center(point);
        let rot = self.props.max_rotation_deg;
        let shift = self.props.max_translate_px;
        self.rotate_x.set_target(-offset.y * rot);
        self.rotate_y.set_target(offset.x * rot);
        self.translate_x.set_target(offset.x * shift);
        self.translate_y.set_target(offset.y * shift);
        self.frame.request()
    }

    /// Pointer left the element. Returns `true` when the host must schedule
    /// a frame.
    pub fn pointer_leave(&mut self) -> bool {
        if self.phase != ParallaxPhase::Tracking {
            return false;
        }
        self.bounds = None;
        for spring in self.springs_mut() {
            spring.set_target(0.0);
        }
        self.transition(ParallaxPhase::Settling);
        self.frame.request()
    }

    /// Animation frame callback, `dt` seconds after the previous one.
    ///
    /// Returns `true` if another frame is needed.
    pub fn on_frame(&mut self, dt: f32) -> bool {
        if !self.frame.begin_frame() {
            return false;
        }
        for spring in self.springs_mut() {
            spring.step(dt);
        }
        let settled = self.springs().iter().all(|s| s.is_settled(SETTLE_EPSILON));
        if !settled {
            return self.frame.request();
        }
        if self.phase == ParallaxPhase::Settling {
            self.snap_neutral();
            self.transition(ParallaxPhase::Idle);
        }
        false
    }

    /// Current pose, clamped to the configured limits.
    #[must_use]
    pub fn pose(&self) -> Pose {
        let rot = self.props.max_rotation_deg;
        let shift = self.props.max_translate_px;
        Pose {
            rotate_x_deg: self.rotate_x.position().clamp(-rot, rot),
            rotate_y_deg: self.rotate_y.position().clamp(-rot, rot),
            translate_x_px: self.translate_x.position().clamp(-shift, shift),
            translate_y_px: self.translate_y.position().clamp(-shift, shift),
        }
    }

    /// Cancel pending frames and stop reacting to events.
    pub fn teardown(&mut self) {
        self.frame.cancel();
        self.bounds = None;
        self.transition(ParallaxPhase::TornDown);
    }

    fn snap_neutral(&mut self) {
        for spring in self.springs_mut() {
            spring.snap(0.0);
        }
    }

    fn springs(&self) -> [&Spring; 4] {
        [
            &self.rotate_x,
            &self.rotate_y,
            &self.translate_x,
            &self.translate_y,
        ]
    }

    fn springs_mut(&mut self) -> [&mut Spring; 4] {
        [
            &mut self.rotate_x,
            &mut self.rotate_y,
            &mut self.translate_x,
            &mut self.translate_y,
        ]
    }

    fn transition(&mut self, next: ParallaxPhase) {
        if self.phase != next {
            debug!(from = ?self.phase, to = ?next, "parallax logo phase");
            self.phase = next;
        }
    }
}

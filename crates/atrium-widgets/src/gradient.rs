//! Animated background gradient.
//!
//! Several large radial-gradient blobs drift on independent CSS-style loops
//! and are blended together under a blur ("goo") filter. An optional extra
//! blob follows the pointer with exponential smoothing; its per-frame loop
//! stops on its own once the blob has caught up with the pointer.
//!
//! Reduced-effect mode keeps only the first two blobs, drops the pointer
//! blob and disables the filters, for low-end devices.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::{WidgetError, require_positive};
use crate::frame::FrameThrottle;
use crate::geometry::Point;

/// Distance below which the pointer blob counts as having reached its
/// target, per axis.
pub const CONVERGENCE_EPSILON: f32 = 0.1;

/// Number of blobs kept in reduced-effect mode.
pub const REDUCED_LAYER_COUNT: usize = 2;

/// An sRGB colour, written as `[r, g, b]` in props.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "[u8; 3]")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self(r, g, b)
    }
}

impl Rgb {
    /// CSS `r, g, b` triple as used inside `rgba(var(--x), a)`.
    #[must_use]
    pub fn css_triple(&self) -> String {
        format!("{}, {}, {}", self.0, self.1, self.2)
    }
}

/// Looping motion of one blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerMotion {
    /// Up and down through the centre.
    Vertical,
    /// Clockwise orbit.
    Circle,
    /// Counter-clockwise orbit.
    CircleReverse,
    /// Side to side with a slight vertical drift.
    Horizontal,
}

/// Per-frame transform of one blob, relative to its resting position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerTransform {
    pub translate_x_pct: f32,
    pub translate_y_pct: f32,
    pub rotate_deg: f32,
}

/// One gradient blob.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientLayer {
    pub color: Rgb,
    pub motion: LayerMotion,
    pub period: Duration,
}

impl GradientLayer {
    /// Transform after `elapsed` of wall time.
    ///
    /// Translations are triangle waves over one period (`-50% → 50% → -50%`),
    /// rotations a full turn per period.
    #[must_use]
    pub fn transform_at(&self, elapsed: Duration) -> LayerTransform {
        let period = self.period.as_secs_f64();
        if period <= 0.0 {
            return LayerTransform::default();
        }
        #[allow(clippy::cast_possible_truncation)]
        let t = ((elapsed.as_secs_f64() % period) / period) as f32;
        let tri = if t <= 0.5 { t * 2.0 } else { 2.0 - t * 2.0 };
        match self.motion {
            LayerMotion::Vertical => LayerTransform {
                translate_y_pct: -50.0 + tri * 100.0,
                ..LayerTransform::default()
            },
            LayerMotion::Horizontal => LayerTransform {
                translate_x_pct: -50.0 + tri * 100.0,
                translate_y_pct: -10.0 + tri * 20.0,
                rotate_deg: 0.0,
            },
            LayerMotion::Circle => LayerTransform {
                rotate_deg: t * 360.0,
                ..LayerTransform::default()
            },
            LayerMotion::CircleReverse => LayerTransform {
                rotate_deg: -t * 360.0,
                ..LayerTransform::default()
            },
        }
    }
}

/// Background gradient props. Defaults reproduce the site's blue/violet
/// palette.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GradientProps {
    pub background_start: Rgb,
    pub background_end: Rgb,
    pub layer_colors: Vec<Rgb>,
    pub pointer_color: Rgb,
    /// Blob diameter as a percentage of the container.
    pub size_pct: f32,
    /// Whether a blob follows the pointer.
    pub interactive: bool,
    pub reduced_effects: bool,
    /// Divisor applied to the remaining distance each frame; larger is slower.
    pub smoothing: f32,
}

impl Default for GradientProps {
    fn default() -> Self {
        Self {
            background_start: Rgb(108, 0, 162),
            background_end: Rgb(0, 17, 82),
            layer_colors: vec![
                Rgb(18, 113, 255),
                Rgb(221, 74, 255),
                Rgb(100, 220, 255),
                Rgb(200, 50, 50),
                Rgb(180, 180, 50),
            ],
            pointer_color: Rgb(140, 100, 255),
            size_pct: 80.0,
            interactive: true,
            reduced_effects: false,
            smoothing: 20.0,
        }
    }
}

impl GradientProps {
    /// # Errors
    ///
    /// Returns [`WidgetError`] when there are no layers, the blob size is
    /// not positive, or smoothing is below 1 (which would overshoot).
    pub fn validate(&self) -> Result<(), WidgetError> {
        if self.layer_colors.is_empty() {
            return Err(WidgetError::Empty {
                prop: "layer_colors",
            });
        }
        require_positive("size_pct", self.size_pct)?;
        if !(self.smoothing.is_finite() && self.smoothing >= 1.0) {
            return Err(WidgetError::invalid(
                "smoothing",
                format!("expected a finite value >= 1, got {}", self.smoothing),
            ));
        }
        Ok(())
    }
}

/// Motion and period cycle assigned to blobs in order.
const LAYER_SCHEDULE: [(LayerMotion, u64); 5] = [
    (LayerMotion::Vertical, 30),
    (LayerMotion::CircleReverse, 20),
    (LayerMotion::Circle, 40),
    (LayerMotion::Horizontal, 40),
    (LayerMotion::Circle, 20),
];

/// The background widget.
#[derive(Debug)]
pub struct GradientBackground {
    props: GradientProps,
    layers: Vec<GradientLayer>,
    follower: Option<PointerFollower>,
    filters_enabled: bool,
}

impl GradientBackground {
    /// # Errors
    ///
    /// Returns [`WidgetError`] if the props are invalid.
    pub fn new(props: GradientProps) -> Result<Self, WidgetError> {
        props.validate()?;
        let reduced = props.reduced_effects;
        let keep = if reduced {
            REDUCED_LAYER_COUNT
        } else {
            props.layer_colors.len()
        };
        let layers = props
            .layer_colors
            .iter()
            .take(keep)
            .enumerate()
            .map(|(i, &color)| {
                let (motion, secs) = LAYER_SCHEDULE[i % LAYER_SCHEDULE.len()];
                GradientLayer {
                    color,
                    motion,
                    period: Duration::from_secs(secs),
                }
            })
            .collect();
        let follower =
            (props.interactive && !reduced).then(|| PointerFollower::new(props.smoothing));
        debug!(reduced, interactive = follower.is_some(), "gradient background created");
        Ok(Self {
            filters_enabled: !reduced,
            props,
            layers,
            follower,
        })
    }

    #[must_use]
    pub fn layers(&self) -> &[GradientLayer] {
        &self.layers
    }

    #[must_use]
    pub fn props(&self) -> &GradientProps {
        &self.props
    }

    /// Whether the blur/goo filters should be applied.
    #[must_use]
    pub fn filters_enabled(&self) -> bool {
        self.filters_enabled
    }

    #[must_use]
    pub fn follower(&self) -> Option<&PointerFollower> {
        self.follower.as_ref()
    }

    /// Pointer moved to `point`, relative to the container. Returns `true`
    /// when the host must schedule a frame.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        self.follower
            .as_mut()
            .is_some_and(|f| f.set_target(point))
    }

    /// Animation frame callback. Returns `true` if another frame is needed.
    pub fn on_frame(&mut self) -> bool {
        self.follower.as_mut().is_some_and(PointerFollower::on_frame)
    }

    pub fn teardown(&mut self) {
        if let Some(f) = self.follower.as_mut() {
            f.teardown();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowState {
    /// At rest on the target; no frames scheduled.
    Idle,
    /// Closing the distance to the target, one step per frame.
    Following,
    TornDown,
}

/// Exponentially smoothed pointer tracker.
///
/// Each frame moves `1 / smoothing` of the remaining distance toward the
/// target, and stops requesting frames once within
/// [`CONVERGENCE_EPSILON`] on both axes.
#[derive(Debug)]
pub struct PointerFollower {
    current: Point,
    target: Point,
    smoothing: f32,
    state: FollowState,
    frame: FrameThrottle,
}

impl PointerFollower {
    #[must_use]
    pub fn new(smoothing: f32) -> Self {
        Self {
            current: Point::default(),
            target: Point::default(),
            smoothing: smoothing.max(1.0),
            state: FollowState::Idle,
            frame: FrameThrottle::new(),
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        self.current
    }

    #[must_use]
    pub fn target(&self) -> Point {
        self.target
    }

    #[must_use]
    pub fn state(&self) -> FollowState {
        self.state
    }

    /// Update the target. Returns `true` when the host must schedule a frame.
    ///
    /// Non-finite targets are ignored.
    pub fn set_target(&mut self, target: Point) -> bool {
        if self.state == FollowState::TornDown || !target.x.is_finite() || !target.y.is_finite() {
            return false;
        }
        self.target = target;
        if self.converged() {
            return false;
        }
        self.state = FollowState::Following;
        self.frame.request()
    }

    /// Advance one frame. Returns `true` if another frame was requested.
    pub fn on_frame(&mut self) -> bool {
        if !self.frame.begin_frame() {
            return false;
        }
        self.current.x += (self.target.x - self.current.x) / self.smoothing;
        self.current.y += (self.target.y - self.current.y) / self.smoothing;
        if self.converged() {
            trace!(x = self.current.x, y = self.current.y, "pointer blob converged");
            self.state = FollowState::Idle;
            return false;
        }
        self.frame.request()
    }

    pub fn teardown(&mut self) {
        self.frame.cancel();
        self.state = FollowState::TornDown;
    }

    fn converged(&self) -> bool {
        (self.target.x - self.current.x).abs() < CONVERGENCE_EPSILON
            && (self.target.y - self.current.y).abs() < CONVERGENCE_EPSILON
    }
}

//! Comet card: a tilt-and-glare card.
//!
//! The card rotates toward the pointer and a glare highlight tracks it. The
//! bounding box is captured once on pointer entry and reused for every move,
//! and move events are coalesced so at most one update runs per animation
//! frame.

use serde::Deserialize;
use tracing::debug;

use crate::error::{WidgetError, require_positive};
use crate::frame::FrameThrottle;
use crate::geometry::{Point, Rect};
use crate::spring::{SETTLE_EPSILON, Spring, SpringConfig};

/// Pointer position range per axis, relative to the card centre.
const HALF: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CometProps {
    /// Maximum tilt in degrees at the card edges.
    pub rotate_depth: f32,
    /// Maximum shift in pixels at the card edges.
    pub translate_depth: f32,
    /// Glare overlay opacity while hovered.
    pub glare_opacity: f32,
    pub spring: SpringConfig,
}

impl Default for CometProps {
    fn default() -> Self {
        Self {
            rotate_depth: 17.5,
            translate_depth: 20.0,
            glare_opacity: 0.6,
            spring: SpringConfig::DEFAULT,
        }
    }
}

impl CometProps {
    /// # Errors
    ///
    /// Returns [`WidgetError`] for non-positive depths, a glare opacity
    /// outside `0..=1`, or an invalid spring.
    pub fn validate(&self) -> Result<(), WidgetError> {
        require_positive("rotate_depth", self.rotate_depth)?;
        require_positive("translate_depth", self.translate_depth)?;
        if !(0.0..=1.0).contains(&self.glare_opacity) {
            return Err(WidgetError::invalid(
                "glare_opacity",
                format!("expected 0..=1, got {}", self.glare_opacity),
            ));
        }
        self.spring.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CometPhase {
    Idle,
    Hovering,
    /// Pointer left; springing back to flat.
    Settling,
    TornDown,
}

/// Render snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CometTilt {
    pub rotate_x_deg: f32,
    pub rotate_y_deg: f32,
    pub translate_x_px: f32,
    pub translate_y_px: f32,
    /// Glare centre in percent of card width, `0..=100`.
    pub glare_x_pct: f32,
    /// Glare centre in percent of card height, `0..=100`.
    pub glare_y_pct: f32,
    pub glare_opacity: f32,
}

#[derive(Debug)]
pub struct CometCard {
    props: CometProps,
    phase: CometPhase,
    bounds: Option<Rect>,
    pending_pointer: Option<Point>,
    x: Spring,
    y: Spring,
    frame: FrameThrottle,
}

impl CometCard {
    /// # Errors
    ///
    /// Returns [`WidgetError`] if the props are invalid.
    pub fn new(props: CometProps) -> Result<Self, WidgetError> {
        props.validate()?;
        Ok(Self {
            props,
            phase: CometPhase::Idle,
            bounds: None,
            pending_pointer: None,
            x: Spring::new(0.0, props.spring),
            y: Spring::new(0.0, props.spring),
            frame: FrameThrottle::new(),
        })
    }

    #[must_use]
    pub fn phase(&self) -> CometPhase {
        self.phase
    }

    /// Bounding box captured at the last pointer entry.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Pointer entered the card; `bounds` is measured once here.
    pub fn pointer_enter(&mut self, bounds: Rect) {
        if self.phase == CometPhase::TornDown {
            return;
        }
        self.bounds = (!bounds.is_degenerate()).then_some(bounds);
        self.transition(CometPhase::Hovering);
    }

    /// Pointer moved. Returns `true` when the host must schedule a frame;
    /// moves arriving before that frame only replace the pending position.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        if self.phase != CometPhase::Hovering || self.bounds.is_none() {
            return false;
        }
        self.pending_pointer = Some(point);
        self.frame.request()
    }

    /// Pointer left the card. Returns `true` when the host must schedule a
    /// frame.
    pub fn pointer_leave(&mut self) -> bool {
        if self.phase != CometPhase::Hovering {
            return false;
        }
        self.bounds = None;
        self.pending_pointer = None;
        self.x.set_target(0.0);
        self.y.set_target(0.0);
        self.transition(CometPhase::Settling);
        self.frame.request()
    }

    /// Animation frame callback, `dt` seconds after the previous one.
    /// Returns `true` if another frame is needed.
    pub fn on_frame(&mut self, dt: f32) -> bool {
        if !self.frame.begin_frame() {
            return false;
        }
        if let (Some(point), Some(bounds)) = (self.pending_pointer.take(), self.bounds) {
            let rel = bounds.relative_position(point);
            self.x.set_target(rel.x);
            self.y.set_target(rel.y);
        }
        self.x.step(dt);
        self.y.step(dt);
        if !(self.x.is_settled(SETTLE_EPSILON) && self.y.is_settled(SETTLE_EPSILON)) {
            return self.frame.request();
        }
        if self.phase == CometPhase::Settling {
            self.x.snap(0.0);
            self.y.snap(0.0);
            self.transition(CometPhase::Idle);
        }
        false
    }

    /// Current transform and glare, clamped to the configured depths.
    #[must_use]
    pub fn tilt(&self) -> CometTilt {
        let x = self.x.position().clamp(-HALF, HALF);
        let y = self.y.position().clamp(-HALF, HALF);
        let rot = self.props.rotate_depth;
        let shift = self.props.translate_depth;
        let glare_opacity = match self.phase {
            CometPhase::Hovering | CometPhase::Settling => self.props.glare_opacity,
            CometPhase::Idle | CometPhase::TornDown => 0.0,
        };
        CometTilt {
            rotate_x_deg: y / HALF * rot,
            rotate_y_deg: -x / HALF * rot,
            translate_x_px: x / HALF * shift,
            translate_y_px: y / HALF * shift,
            glare_x_pct: (x + HALF) * 100.0,
            glare_y_pct: (y + HALF) * 100.0,
            glare_opacity,
        }
    }

    pub fn teardown(&mut self) {
        self.frame.cancel();
        self.bounds = None;
        self.pending_pointer = None;
        self.transition(CometPhase::TornDown);
    }

    fn transition(&mut self, next: CometPhase) {
        if self.phase != next {
            debug!(from = ?self.phase, to = ?next, "comet card phase");
            self.phase = next;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn card() -> CometCard {
        CometCard::new(CometProps::default()).unwrap()
    }

    fn drain(card: &mut CometCard) {
        let mut frames = 0;
        while card.on_frame(FRAME) {
            frames += 1;
            assert!(frames < 10_000, "frame loop never terminated");
        }
    }

    #[test]
    fn moves_before_enter_are_ignored() {
        let mut c = card();
        assert!(!c.pointer_move(Point::new(10.0, 10.0)));
        let tilt = c.tilt();
        assert_eq!(tilt.rotate_x_deg, 0.0);
        assert_eq!(tilt.rotate_y_deg, 0.0);
        assert_eq!(tilt.glare_x_pct, 50.0);
        assert_eq!(tilt.glare_opacity, 0.0);
    }

    #[test]
    fn many_moves_in_one_frame_schedule_once() {
        let mut c = card();
        c.pointer_enter(Rect::new(0.0, 0.0, 200.0, 300.0));
        assert!(c.pointer_move(Point::new(10.0, 10.0)));
        for i in 0..50u8 {
            assert!(!c.pointer_move(Point::new(f32::from(i), 20.0)));
        }
        assert!(c.on_frame(FRAME));
    }

    #[test]
    fn last_move_in_a_frame_wins() {
        let mut c = card();
        c.pointer_enter(Rect::new(0.0, 0.0, 100.0, 100.0));
        c.pointer_move(Point::new(0.0, 0.0));
        c.pointer_move(Point::new(100.0, 50.0));
        c.on_frame(FRAME);
        drain(&mut c);
        let tilt = c.tilt();
        assert!((tilt.rotate_y_deg + 17.5).abs() < 0.5);
        assert!(tilt.rotate_x_deg.abs() < 0.5);
        assert!((tilt.glare_x_pct - 100.0).abs() < 1.0);
        assert!((tilt.glare_y_pct - 50.0).abs() < 1.0);
        assert!((tilt.translate_x_px - 20.0).abs() < 0.5);
    }

    #[test]
    fn bounds_are_captured_on_enter_only() {
        let mut c = card();
        let first = Rect::new(0.0, 0.0, 100.0, 100.0);
        c.pointer_enter(first);
        c.pointer_move(Point::new(50.0, 50.0));
        c.on_frame(FRAME);
        assert_eq!(c.bounds(), Some(first));
    }

    #[test]
    fn tilt_never_exceeds_depth() {
        let mut c = card();
        c.pointer_enter(Rect::new(0.0, 0.0, 100.0, 100.0));
        c.pointer_move(Point::new(100.0, 100.0));
        let mut frames = 0;
        while c.on_frame(FRAME) {
            let t = c.tilt();
            assert!(t.rotate_x_deg.abs() <= 17.5);
            assert!(t.rotate_y_deg.abs() <= 17.5);
            assert!((0.0..=100.0).contains(&t.glare_x_pct));
            frames += 1;
            assert!(frames < 10_000);
        }
    }

    #[test]
    fn leave_returns_to_flat_and_idle() {
        let mut c = card();
        c.pointer_enter(Rect::new(0.0, 0.0, 100.0, 100.0));
        c.pointer_move(Point::new(90.0, 10.0));
        drain(&mut c);
        assert!(c.pointer_leave());
        assert_eq!(c.tilt().glare_opacity, 0.6);
        drain(&mut c);
        assert_eq!(c.phase(), CometPhase::Idle);
        let tilt = c.tilt();
        assert_eq!(tilt.rotate_x_deg, 0.0);
        assert_eq!(tilt.glare_opacity, 0.0);
        assert_eq!(tilt.glare_x_pct, 50.0);
    }

    #[test]
    fn teardown_drops_pending_frame() {
        let mut c = card();
        c.pointer_enter(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(c.pointer_move(Point::new(30.0, 30.0)));
        c.teardown();
        assert!(!c.on_frame(FRAME));
        c.pointer_enter(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(c.phase(), CometPhase::TornDown);
    }

    #[test]
    fn degenerate_bounds_disable_tracking() {
        let mut c = card();
        c.pointer_enter(Rect::new(0.0, 0.0, 0.0, 0.0));
        assert!(!c.pointer_move(Point::new(1.0, 1.0)));
    }

    #[test]
    fn rejects_out_of_range_glare() {
        let props = CometProps {
            glare_opacity: 1.5,
            ..CometProps::default()
        };
        assert!(CometCard::new(props).is_err());
    }
}

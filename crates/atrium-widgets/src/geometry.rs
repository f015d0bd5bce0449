//! Minimal 2D geometry in CSS pixels.

use serde::Deserialize;

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An element's bounding box, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the box can be used to normalize pointer positions.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Pointer offset from the centre, scaled so the edges map to `±1`.
    ///
    /// Positions outside the box are clamped. Degenerate boxes yield the
    /// neutral offset.
    #[must_use]
    pub fn offset_from_center(&self, point: Point) -> Point {
        if self.is_degenerate() {
            return Point::default();
        }
        let c = self.center();
        Point::new(
            ((point.x - c.x) / (self.width / 2.0)).clamp(-1.0, 1.0),
            ((point.y - c.y) / (self.height / 2.0)).clamp(-1.0, 1.0),
        )
    }

    /// Pointer position relative to the box, in `[-0.5, 0.5]` per axis.
    #[must_use]
    pub fn relative_position(&self, point: Point) -> Point {
        let o = self.offset_from_center(point);
        Point::new(o.x / 2.0, o.y / 2.0)
    }
}

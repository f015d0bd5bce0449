//! 3D image marquee.
//!
//! The image list is split into four columns laid out on a tilted plane.
//! Each column slides up and down forever; even columns travel down on a
//! 10 s loop, odd columns up on a 15 s loop, so neighbours never line up.
//! The animation clock only advances while the [`ViewGate`] is open.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::visibility::{DocumentVisibility, ViewGate};

/// Number of columns the images are partitioned into.
pub const COLUMN_COUNT: usize = 4;

/// Vertical travel of one half-loop, in pixels.
pub const COLUMN_TRAVEL_PX: f32 = 100.0;

const EVEN_PERIOD: Duration = Duration::from_secs(10);
const ODD_PERIOD: Duration = Duration::from_secs(15);

/// Marquee props.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarqueeProps {
    /// Image URLs, in display order.
    pub images: Vec<String>,
}

/// Travel direction of the first half of a column's loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

/// Loop parameters for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMotion {
    pub direction: Direction,
    /// Duration of one half-loop (rest position to full travel).
    pub period: Duration,
}

impl ColumnMotion {
    /// Motion for the column at `index`.
    #[must_use]
    pub fn for_column(index: usize) -> Self {
        if index % 2 == 0 {
            Self {
                direction: Direction::Down,
                period: EVEN_PERIOD,
            }
        } else {
            Self {
                direction: Direction::Up,
                period: ODD_PERIOD,
            }
        }
    }

    /// Vertical offset after `elapsed` of animation time.
    ///
    /// The loop mirrors back and forth (`0 → ±travel → 0`), so the offset is
    /// continuous across loop boundaries.
    #[must_use]
    pub fn offset_at(&self, elapsed: Duration) -> f32 {
        let period = self.period.as_secs_f64();
        let phase = (elapsed.as_secs_f64() % (2.0 * period)) / period;
        let progress = if phase <= 1.0 { phase } else { 2.0 - phase };
        #[allow(clippy::cast_possible_truncation)]
        let magnitude = (progress as f32) * COLUMN_TRAVEL_PX;
        match self.direction {
            Direction::Down => magnitude,
            Direction::Up => -magnitude,
        }
    }
}

/// Split `images` into [`COLUMN_COUNT`] order-preserving columns of
/// `ceil(len / 4)` images each. Trailing columns may be short or empty.
#[must_use]
pub fn partition<T: Clone>(images: &[T]) -> Vec<Vec<T>> {
    let chunk = images.len().div_ceil(COLUMN_COUNT);
    (0..COLUMN_COUNT)
        .map(|col| {
            let start = (col * chunk).min(images.len());
            let end = (start + chunk).min(images.len());
            images[start..end].to_vec()
        })
        .collect()
}

/// Whether the marquee clock is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarqueeState {
    Paused,
    Running,
    TornDown,
}

/// One rendered column.
#[derive(Debug, Clone, PartialEq)]
pub struct MarqueeColumn {
    pub images: Vec<String>,
    pub motion: ColumnMotion,
}

/// The marquee widget.
#[derive(Debug)]
pub struct Marquee {
    columns: Vec<MarqueeColumn>,
    gate: ViewGate,
    clock: Duration,
    state: MarqueeState,
}

impl Marquee {
    #[must_use]
    pub fn new(props: MarqueeProps) -> Self {
        Self::with_gate(props, ViewGate::new())
    }

    /// Create a marquee with an initial environment reading.
    #[must_use]
    pub fn with_gate(props: MarqueeProps, gate: ViewGate) -> Self {
        let columns = partition(&props.images)
            .into_iter()
            .enumerate()
            .map(|(i, images)| MarqueeColumn {
                images,
                motion: ColumnMotion::for_column(i),
            })
            .collect();
        let state = if gate.is_open() {
            MarqueeState::Running
        } else {
            MarqueeState::Paused
        };
        Self {
            columns,
            gate,
            clock: Duration::ZERO,
            state,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[MarqueeColumn] {
        &self.columns
    }

    #[must_use]
    pub fn state(&self) -> MarqueeState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == MarqueeState::Running
    }

    pub fn set_intersecting(&mut self, in_view: bool) -> MarqueeState {
        self.gate.set_intersecting(in_view);
        self.sync()
    }

    pub fn set_document_visibility(&mut self, document: DocumentVisibility) -> MarqueeState {
        self.gate.set_document_visibility(document);
        self.sync()
    }

    /// Advance the animation clock by one frame. Ignored unless running.
    pub fn advance(&mut self, dt: Duration) {
        if self.is_running() {
            self.clock = self.clock.saturating_add(dt);
        }
    }

    /// Accumulated animation time.
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Current vertical offset of every column.
    #[must_use]
    pub fn column_offsets(&self) -> Vec<f32> {
        self.columns
            .iter()
            .map(|c| c.motion.offset_at(self.clock))
            .collect()
    }

    /// Stop the marquee permanently.
    pub fn teardown(&mut self) {
        self.state = MarqueeState::TornDown;
    }

    fn sync(&mut self) -> MarqueeState {
        if self.state == MarqueeState::TornDown {
            return self.state;
        }
        let next = if self.gate.is_open() {
            MarqueeState::Running
        } else {
            MarqueeState::Paused
        };
        if next != self.state {
            debug!(from = ?self.state, to = ?next, "marquee state changed");
            self.state = next;
        }
        self.state
    }
}

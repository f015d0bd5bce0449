//! Interaction core for the Atrium marketing-site widgets.
//!
//! Every widget here is a renderer-agnostic state machine. The host (a web
//! front end, a native shell, or a test) feeds it pointer, viewport,
//! visibility, timer and animation-frame events and reads back a snapshot to
//! paint. Nothing in this crate performs I/O or owns a clock: elapsed time is
//! always passed in, which keeps each transition deterministic.
//!
//! Animation-frame work is gated by [`frame::FrameThrottle`], so at most one
//! update is scheduled per frame, and every widget exposes `teardown()` which
//! cancels all outstanding frame and timer work.

pub mod comet;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod gradient;
pub mod marquee;
pub mod pagination;
pub mod parallax;
pub mod spring;
pub mod text_flip;
pub mod visibility;

pub use error::WidgetError;

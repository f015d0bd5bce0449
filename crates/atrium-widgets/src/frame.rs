//! Animation-frame throttling.
//!
//! Pointer and scroll events can arrive many times between two paints. A
//! [`FrameThrottle`] holds a single pending-update flag: the first request
//! in a frame asks the host to schedule a callback, later requests are
//! coalesced into it. Cancelling the throttle is terminal, which is how
//! widgets guarantee that nothing is scheduled after teardown.

/// Lifecycle of the pending-update flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameState {
    /// No frame is scheduled.
    #[default]
    Idle,
    /// A frame callback has been requested and not yet delivered.
    Pending,
    /// The owner was torn down; no further frames will be requested.
    Cancelled,
}

/// Coalesces update requests into at most one animation frame.
#[derive(Debug, Default)]
pub struct FrameThrottle {
    state: FrameState,
}

impl FrameThrottle {
    /// Create an idle throttle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a frame.
    ///
    /// Returns `true` only when the host must schedule a new frame callback.
    /// Returns `false` when one is already pending or the throttle was
    /// cancelled.
    pub fn request(&mut self) -> bool {
        match self.state {
            FrameState::Idle => {
                self.state = FrameState::Pending;
                true
            }
            FrameState::Pending | FrameState::Cancelled => false,
        }
    }

    /// Consume the pending request at the start of a frame callback.
    ///
    /// Returns `false` for a stale callback (nothing pending, or cancelled),
    /// in which case the caller must do no work.
    pub fn begin_frame(&mut self) -> bool {
        if self.state == FrameState::Pending {
            self.state = FrameState::Idle;
            true
        } else {
            false
        }
    }

    /// Drop any pending request and refuse all future ones.
    pub fn cancel(&mut self) {
        self.state = FrameState::Cancelled;
    }

    /// Current flag state.
    #[must_use]
    pub fn state(&self) -> FrameState {
        self.state
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state == FrameState::Pending
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state == FrameState::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_schedules_and_rest_coalesce() {
        let mut throttle = FrameThrottle::new();
        assert!(throttle.request());
        assert!(!throttle.request());
        assert!(!throttle.request());
        assert!(throttle.is_pending());
    }

    #[test]
    fn begin_frame_rearms_the_flag() {
        let mut throttle = FrameThrottle::new();
        assert!(throttle.request());
        assert!(throttle.begin_frame());
        assert_eq!(throttle.state(), FrameState::Idle);
        assert!(throttle.request());
    }

    #[test]
    fn stale_frame_does_no_work() {
        let mut throttle = FrameThrottle::new();
        assert!(!throttle.begin_frame());
    }

    #[test]
    fn cancel_is_terminal() {
        let mut throttle = FrameThrottle::new();
        assert!(throttle.request());
        throttle.cancel();
        assert!(!throttle.begin_frame());
        assert!(!throttle.request());
        assert!(throttle.is_cancelled());
    }
}

use std::time::Duration;

/// A failed state check raised on a timer thread.
///
/// Timer threads are detached, so nothing can catch an error they return.
/// Each violation is logged and sent to the door's channel instead, see
/// [`Door::violations`](crate::Door::violations).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    /// The door's timeout, in ticks.
    pub timeout: u64,
    /// Length of one tick.
    pub tick: Duration,
    /// Time since the most recent unlock, measured when the check failed.
    pub open_for: Option<Duration>,
}

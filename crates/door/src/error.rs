use std::{io, time::Duration};

/// Represents all possible errors that can occur in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The door was found open when its timeout was checked.
    #[error("Door has been left open too long (timeout: {timeout} x {tick:?})")]
    StateViolation { timeout: u64, tick: Duration },

    /// A door was built with a timeout of zero.
    #[error("Door timeout must be positive, got {0}")]
    InvalidTimeout(u64),

    /// A door was built with a zero-length tick.
    #[error("Door tick must be non-zero")]
    InvalidTick,

    /// The OS refused to start a timer thread.
    #[error("Failed to spawn timer thread: {0}")]
    Spawn(#[source] io::Error),

    /// Door settings could not be loaded.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(#[from] config::Error),
}

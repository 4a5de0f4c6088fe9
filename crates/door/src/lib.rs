//! A door that reports itself when left unlocked past its timeout.
//!
//! ```
//! # use door::Door;
//! let door = Door::new(30)?;
//! door.unlock();
//! assert!(door.is_open());
//! assert!(door.check_state_or_fail().is_err());
//! door.lock();
//! assert!(door.check_state_or_fail().is_ok());
//! # Ok::<(), door::Error>(())
//! ```
#![forbid(unsafe_code)]

mod door;
mod error;
mod notifier;
pub mod timer;
mod violation;

pub use door::{Door, VIOLATION_QUEUE};
pub use error::Error;
pub use notifier::Notifier;
pub use timer::{Timer, TimerClient};
pub use violation::Violation;

use crate::{Door, Error, door::DoorState, timer::TimerClient};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Forwards timer events to a door's state check.
///
/// The timer only knows about [`TimerClient`], so any other client can stand
/// in for a door. The link back to the door is weak: a timer that outlives its
/// door finds nothing to check.
#[derive(Debug)]
pub struct Notifier {
    door: Weak<DoorState>,
}

impl Notifier {
    pub fn new(door: &Door) -> Self {
        Self::bind(door.state())
    }

    pub(crate) fn bind(state: &Arc<DoorState>) -> Self {
        Self {
            door: Arc::downgrade(state),
        }
    }

    /// Run the door's state check and return its result.
    ///
    /// A door that no longer exists passes.
    pub fn check(&self) -> Result<(), Error> {
        match self.door.upgrade() {
            Some(door) => door.check_state_or_fail(),
            None => Ok(()),
        }
    }
}

impl TimerClient for Notifier {
    fn on_timeout(&self) {
        let Some(door) = self.door.upgrade() else {
            debug!("door dropped before its timer fired");
            return;
        };
        if let Err(err) = door.check_state_or_fail() {
            door.report(&err);
        }
    }
}

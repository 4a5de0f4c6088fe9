#![forbid(unsafe_code)]

use crate::Error;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::time::Duration;

/// Wall time of `count` ticks, saturating instead of overflowing.
pub fn ticks(tick: Duration, count: u64) -> Duration {
    tick.saturating_mul(u32::try_from(count).unwrap_or(u32::MAX))
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DoorSettings {
    /// How many ticks the door may stay unlocked before it is reported.
    pub timeout: u64,

    /// Length of one tick in milliseconds.
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub tick: Duration,
}

impl Default for DoorSettings {
    fn default() -> Self {
        Self {
            timeout: 10,
            tick: Duration::from_secs(1),
        }
    }
}

impl DoorSettings {
    /// Wall time the door may stay unlocked.
    pub fn timeout_duration(&self) -> Duration {
        ticks(self.tick, self.timeout)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.timeout == 0 {
            return Err(Error::Invalid("door.timeout must be positive".into()));
        }
        if self.tick.is_zero() {
            return Err(Error::Invalid("door.tick must be non-zero".into()));
        }
        Ok(())
    }
}

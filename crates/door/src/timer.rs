//! One-shot timers that call back into a [`TimerClient`].
//!
//! A scheduled timer runs on its own detached thread. It cannot be cancelled
//! or joined: once scheduled it sleeps for its delay, calls the client exactly
//! once and exits.

use crate::Error;
use config::ticks;
use std::{sync::Arc, thread, time::Duration};
use tracing::{debug, trace};

/// Something that wants to hear about an elapsed timer.
///
/// `on_timeout` is called from the timer's own thread, never from the thread
/// that scheduled it.
pub trait TimerClient: Send + Sync {
    fn on_timeout(&self);
}

/// Schedules delayed callbacks. Delays are counted in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    tick: Duration,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Timer {
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Block the calling thread.
    pub fn sleep_for(milliseconds: u64) {
        thread::sleep(Duration::from_millis(milliseconds));
    }

    /// Call `client.on_timeout()` once, `delay` ticks from now.
    ///
    /// Returns as soon as the timer thread is started. The only failure is
    /// the OS refusing to start it.
    pub fn schedule_once(&self, delay: u64, client: Arc<dyn TimerClient>) -> Result<(), Error> {
        let wait = ticks(self.tick, delay);
        thread::Builder::new()
            .name("door-timer".into())
            .spawn(move || {
                thread::sleep(wait);
                trace!(?wait, "timer fired");
                client.on_timeout();
            })
            .map_err(Error::Spawn)?;

        debug!(delay, ?wait, "scheduled one-shot timer");
        Ok(())
    }
}

use crate::{Error, Notifier, Timer, Violation};
use config::{Config, DoorSettings, ticks};
use parking_lot::Mutex;
use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};
use tracing::{debug, error};

/// Violations a door holds for its receivers before new ones are dropped.
pub const VIOLATION_QUEUE: usize = 64;

/// State shared between a door and the timers it has armed.
#[derive(Debug)]
pub(crate) struct DoorState {
    timeout: u64,

    tick: Duration,

    /// Written by the owner, read by timer threads.
    is_open: AtomicBool,

    /// When the door was last unlocked.
    opened_at: Mutex<Option<Instant>>,

    violations: flume::Sender<Violation>,
}

impl DoorState {
    pub(crate) fn is_open(&self) -> bool {
        self.is_open.load(Ordering::Acquire)
    }

    pub(crate) fn check_state_or_fail(&self) -> Result<(), Error> {
        if self.is_open() {
            return Err(Error::StateViolation {
                timeout: self.timeout,
                tick: self.tick,
            });
        }
        Ok(())
    }

    /// Surface a failed check that nobody is waiting on.
    pub(crate) fn report(&self, err: &Error) {
        let opened_at = *self.opened_at.lock();
        let open_for = opened_at.map(|at| at.elapsed());
        error!(error = %err, ?open_for, "door left open past its timeout");

        let violation = Violation {
            timeout: self.timeout,
            tick: self.tick,
            open_for,
        };
        match self.violations.try_send(violation) {
            Ok(()) => {}
            Err(flume::TrySendError::Full(_)) => {
                debug!(capacity = VIOLATION_QUEUE, "violation queue full, dropping")
            }
            Err(flume::TrySendError::Disconnected(_)) => debug!("no violation receivers left"),
        }
    }
}

/// A door that must not stay unlocked for longer than its timeout.
///
/// Every [`unlock`](Door::unlock) arms a one-shot timer. When it fires, the
/// door is checked: still open means a [`Violation`]. Timers are never
/// cancelled, so a door that is unlocked repeatedly accumulates one sleeping
/// timer thread per unlock until each of them has fired.
#[derive(Debug)]
pub struct Door {
    state: Arc<DoorState>,
    notifier: Arc<Notifier>,
    violations: flume::Receiver<Violation>,
}

impl Door {
    /// Create a closed door with a timeout counted in seconds.
    pub fn new(timeout: u64) -> Result<Self, Error> {
        Self::with_tick(timeout, Timer::default().tick())
    }

    /// Create a closed door with a timeout counted in `tick` units.
    pub fn with_tick(timeout: u64, tick: Duration) -> Result<Self, Error> {
        if timeout == 0 {
            return Err(Error::InvalidTimeout(timeout));
        }
        if tick.is_zero() {
            return Err(Error::InvalidTick);
        }

        let (tx, rx) = flume::bounded(VIOLATION_QUEUE);
        let state = Arc::new(DoorState {
            timeout,
            tick,
            is_open: AtomicBool::new(false),
            opened_at: Mutex::new(None),
            violations: tx,
        });
        let notifier = Arc::new(Notifier::bind(&state));

        Ok(Self {
            state,
            notifier,
            violations: rx,
        })
    }

    pub fn from_settings(settings: &DoorSettings) -> Result<Self, Error> {
        Self::with_tick(settings.timeout, settings.tick)
    }

    /// Build a door from the `[door]` section of a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let config = Config::load(path)?;
        debug!(?config, "loaded door config");
        Self::from_settings(&config.door)
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Open the door and arm a timer for its timeout.
    pub fn unlock(&self) {
        *self.state.opened_at.lock() = Some(Instant::now());
        self.state.is_open.store(true, Ordering::Release);
        debug!(timeout = self.state.timeout, "door unlocked");

        let timer = Timer::new(self.state.tick);
        if let Err(err) = timer.schedule_once(self.state.timeout, self.notifier.clone()) {
            error!(error = %err, "failed to arm door timer");
        }
    }

    /// Close the door. Timers armed earlier still fire and find it closed.
    pub fn lock(&self) {
        self.state.is_open.store(false, Ordering::Release);
        debug!("door locked");
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.state.timeout
    }

    /// The timeout as wall time.
    pub fn timeout(&self) -> Duration {
        ticks(self.state.tick, self.state.timeout)
    }

    /// Fail with [`Error::StateViolation`] if the door is open right now.
    ///
    /// Timers call this through the door's [`Notifier`]; calling it directly
    /// behaves the same.
    pub fn check_state_or_fail(&self) -> Result<(), Error> {
        self.state.check_state_or_fail()
    }

    pub fn notifier(&self) -> Arc<Notifier> {
        Arc::clone(&self.notifier)
    }

    /// Violations raised by this door's timers.
    ///
    /// Every receiver shares one queue, so each violation goes to exactly one
    /// of them. The queue holds at most [`VIOLATION_QUEUE`] entries; later
    /// violations are only logged until it is drained. The channel
    /// disconnects when the door is dropped.
    pub fn violations(&self) -> flume::Receiver<Violation> {
        self.violations.clone()
    }

    pub(crate) fn state(&self) -> &Arc<DoorState> {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use crate::timer::TimerClient;

    #[test]
    fn starts_closed() {
        let door = Door::new(100).unwrap();
        assert!(!door.is_open());
        assert!(door.check_state_or_fail().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(matches!(Door::new(0), Err(Error::InvalidTimeout(0))));
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(matches!(
            Door::with_tick(5, Duration::ZERO),
            Err(Error::InvalidTick)
        ));
    }

    #[test]
    fn timeout_duration_uses_tick() {
        let door = Door::with_tick(100, Duration::from_millis(3)).unwrap();
        assert_eq!(door.timeout_seconds(), 100);
        assert_eq!(door.timeout(), Duration::from_millis(300));
        assert_eq!(Door::new(7).unwrap().timeout(), Duration::from_secs(7));
    }

    #[test]
    fn from_settings_copies_values() {
        let settings = DoorSettings {
            timeout: 42,
            tick: Duration::from_millis(5),
        };
        let door = Door::from_settings(&settings).unwrap();
        assert_eq!(door.timeout_seconds(), 42);
        assert_eq!(door.timeout(), settings.timeout_duration());
    }

    #[test]
    fn error_message_names_the_fault() {
        let door = Door::new(100).unwrap();
        door.unlock();
        let err = door.check_state_or_fail().unwrap_err();
        assert!(err.to_string().contains("left open too long"));
    }

    #[test]
    fn violation_measures_from_latest_unlock() {
        let door = Door::new(100).unwrap();
        let violations = door.violations();
        door.unlock();
        Timer::sleep_for(100);
        door.unlock();

        door.notifier().on_timeout();
        let open_for = violations.try_recv().unwrap().open_for.unwrap();
        assert!(open_for < Duration::from_millis(100));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        // `true` unlocks, `false` locks. Timeouts are far beyond the test's
        // lifetime so only direct checks are observed.
        #[test]
        fn state_follows_last_operation(
            timeout in 10_000u64..u64::MAX,
            ops in prop::collection::vec(any::<bool>(), 0..8),
        ) {
            let door = Door::new(timeout).unwrap();
            for &unlock in &ops {
                if unlock {
                    door.unlock();
                } else {
                    door.lock();
                }
            }

            let expect_open = ops.last().copied().unwrap_or(false);
            prop_assert_eq!(door.is_open(), expect_open);
            prop_assert_eq!(door.check_state_or_fail().is_err(), expect_open);
            prop_assert_eq!(door.timeout_seconds(), timeout);
        }
    }
}

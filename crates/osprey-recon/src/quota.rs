//! Cooldown switch for the generative narrative path.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, PoisonError};

/// Cooldown applied after the model API reports quota exhaustion
const COOLDOWN_HOURS: i64 = 24;

/// Time source for the breaker. Injectable so tests can advance the
/// clock instead of sleeping.
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Process-lifetime switch disabling the generative narrative while a
/// quota cooldown is active.
///
/// Holds an optional blocked-until instant behind a mutex. The state is
/// only eventually consistent across concurrent requests: two requests
/// racing the trip both attempt the model call once, after which the
/// cooldown holds - acceptable and self-correcting.
#[derive(Clone)]
pub struct QuotaBreaker {
    blocked_until: Arc<Mutex<Option<DateTime<Utc>>>>,
    clock: Arc<dyn Clock>,
}

impl Default for QuotaBreaker {
    fn default() -> Self {
        Self::new()
    }
}

impl QuotaBreaker {
    /// Create a breaker on the system clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a breaker on an injected clock
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            blocked_until: Arc::new(Mutex::new(None)),
            clock,
        }
    }

    /// True while a cooldown is active. An expired timestamp is cleared
    /// on read, so the breaker re-arms itself once the window passes.
    pub fn is_blocked(&self) -> bool {
        let mut guard = self
            .blocked_until
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match *guard {
            Some(until) if self.clock.now() < until => true,
            Some(_) => {
                *guard = None;
                false
            }
            None => false,
        }
    }

    /// Start the cooldown window from the current instant.
    pub fn trip(&self) {
        let until = self.clock.now() + Duration::hours(COOLDOWN_HOURS);
        let mut guard = self
            .blocked_until
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl FakeClock {
        fn at(now: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self { now: Mutex::new(now) })
        }

        fn advance(&self, duration: Duration) {
            let mut guard = self.now.lock().unwrap();
            *guard += duration;
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    #[test]
    fn test_starts_unblocked() {
        let breaker = QuotaBreaker::new();
        assert!(!breaker.is_blocked());
    }

    #[test]
    fn test_trip_blocks_until_cooldown_elapses() {
        let clock = FakeClock::at(Utc::now());
        let breaker = QuotaBreaker::with_clock(clock.clone());

        breaker.trip();
        assert!(breaker.is_blocked());

        clock.advance(Duration::hours(23));
        assert!(breaker.is_blocked());

        clock.advance(Duration::hours(1) + Duration::seconds(1));
        assert!(!breaker.is_blocked());
        // The expired timestamp stays cleared.
        assert!(!breaker.is_blocked());
    }

    #[test]
    fn test_clones_share_state() {
        let clock = FakeClock::at(Utc::now());
        let breaker = QuotaBreaker::with_clock(clock);
        let other = breaker.clone();

        breaker.trip();
        assert!(other.is_blocked());
    }
}

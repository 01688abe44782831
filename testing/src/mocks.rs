//! Mock implementations of environment traits.

use campus_events_core::environment::Clock;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

/// Fixed clock for deterministic tests.
///
/// Returns a settable instant instead of the wall clock, so status
/// derivation and timestamps are reproducible.
///
/// # Example
///
/// ```
/// use campus_events_testing::mocks::FixedClock;
/// use campus_events_core::environment::Clock;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let noon = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap();
/// let clock = FixedClock::at(noon);
/// assert_eq!(clock.now(), noon);
///
/// clock.advance(Duration::hours(2));
/// assert_eq!(clock.now(), noon + Duration::hours(2));
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    /// Create a clock frozen at the given instant.
    #[must_use]
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            time: Arc::new(Mutex::new(time)),
        }
    }

    /// Move the clock to a new instant.
    pub fn set(&self, time: DateTime<Utc>) {
        match self.time.lock() {
            Ok(mut guard) => *guard = time,
            Err(poisoned) => *poisoned.into_inner() = time,
        }
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        match self.time.lock() {
            Ok(mut guard) => *guard += duration,
            Err(poisoned) => *poisoned.into_inner() += duration,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.time.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_is_deterministic() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap();
        let clock = FixedClock::at(instant);

        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), instant);
    }

    #[test]
    fn clones_share_the_same_time() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap();
        let clock = FixedClock::at(instant);
        let shared = clock.clone();

        clock.advance(Duration::minutes(30));
        assert_eq!(shared.now(), instant + Duration::minutes(30));
    }
}

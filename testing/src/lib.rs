//! # Staybook Testing
//!
//! Test doubles and helpers shared by the Staybook crates:
//! - Deterministic clocks (`FixedClock`, and `TestClock` for time travel)
//! - `ReducerTest`, a Given-When-Then builder for reducers
//! - Effect assertions
//!
//! ## Example
//!
//! ```ignore
//! use staybook_testing::{ReducerTest, TestClock, assertions};
//!
//! ReducerTest::new(BookingReducer::new())
//!     .with_env(test_environment())
//!     .given_state(BookingState::default())
//!     .when_action(BookingAction::Request { .. })
//!     .then_state(|state| assert_eq!(state.len(), 1))
//!     .then_effects(|effects| assertions::assert_effects_count(effects, 2))
//!     .run();
//! ```

use chrono::{DateTime, Duration, Utc};
use staybook_core::environment::Clock;

pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Duration, Utc};
    use std::sync::{Arc, RwLock};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use staybook_testing::mocks::FixedClock;
    /// use staybook_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// A shared, movable clock for time-travel scenarios.
    ///
    /// Clones share the same instant, so a test can hand one clone to the
    /// environment and move time from the outside.
    ///
    /// ```
    /// use staybook_testing::mocks::TestClock;
    /// use staybook_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = TestClock::new(Utc::now());
    /// let start = clock.now();
    /// clock.advance(Duration::days(7));
    /// assert_eq!(clock.now() - start, Duration::days(7));
    /// ```
    #[derive(Debug, Clone)]
    pub struct TestClock {
        time: Arc<RwLock<DateTime<Utc>>>,
    }

    impl TestClock {
        /// Create a clock frozen at `time`
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(RwLock::new(time)),
            }
        }

        /// Jump to an absolute instant
        pub fn travel_to(&self, time: DateTime<Utc>) {
            if let Ok(mut current) = self.time.write() {
                *current = time;
            }
        }

        /// Move time forward (or backward, with a negative duration)
        pub fn advance(&self, by: Duration) {
            if let Ok(mut current) = self.time.write() {
                *current += by;
            }
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
                .read()
                .map_or_else(|poisoned| *poisoned.into_inner(), |time| *time)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_089))
    }
}

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs it.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

pub use mocks::{FixedClock, TestClock, test_clock};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default());
    }

    #[test]
    fn test_clock_clones_share_time() {
        let clock = TestClock::new(test_clock().now());
        let observer = clock.clone();

        clock.advance(Duration::days(-7));
        assert_eq!(observer.today().day(), 25);

        clock.travel_to(test_clock().now());
        assert_eq!(observer.now(), test_clock().now());
    }
}

use chrono::{DateTime, Utc};
use std::fmt::Debug;

/// Source of the current time.
///
/// Every expiry computation goes through a `Clock` so that token lifetimes
/// can be tested against a fixed instant.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrozenClock(DateTime<Utc>);

impl FrozenClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }

    /// Freezes the clock at the given Unix timestamp (seconds).
    pub fn at_timestamp(seconds: i64) -> Self {
        Self(DateTime::from_timestamp(seconds, 0).unwrap_or_default())
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

//! Time source for expiry checks.

use chrono::Utc;

pub trait Clock {
    /// Current time as whole seconds since the Unix epoch.
    fn now_epoch_seconds(&self) -> i64;
}

/// Wall-clock time, rounded to the nearest second.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> i64 {
        round_millis_to_seconds(Utc::now().timestamp_millis())
    }
}

/// A clock frozen at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> i64 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_epoch_seconds(&self) -> i64 {
        (**self).now_epoch_seconds()
    }
}

fn round_millis_to_seconds(millis: i64) -> i64 {
    (millis + 500).div_euclid(1000)
}

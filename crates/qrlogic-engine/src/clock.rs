// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Time source port: a monotonic instant for debounce and the local hour
//! for the ambient `timeOfDay` sensor.

use chrono::Timelike;
use std::fmt;
use std::time::Instant;

/// Source of time for the engine.
pub trait Clock {
    /// Monotonic now, used for debounce windows and log timestamps.
    fn now(&self) -> Instant;
    /// Local wall-clock hour, `0..=23`.
    fn local_hour(&self) -> u32;
}

/// The host's clocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn local_hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn local_hour(&self) -> u32 {
        (**self).local_hour()
    }
}

/// Value of the `timeOfDay` sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    /// Strictly after 06:00 and before 19:00.
    Day,
    /// Everything else.
    Night,
}

impl TimeOfDay {
    /// `Day` when `6 < hour < 19`.
    pub fn from_hour(hour: u32) -> Self {
        if hour > 6 && hour < 19 {
            TimeOfDay::Day
        } else {
            TimeOfDay::Night
        }
    }

    /// Reading as compared against condition operands.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Day => "day",
            TimeOfDay::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn day_is_the_open_interval_six_to_nineteen() {
        let day: Vec<u32> = (0..24)
            .filter(|h| TimeOfDay::from_hour(*h) == TimeOfDay::Day)
            .collect();
        assert_eq!(day, (7..19).collect::<Vec<_>>());
    }

    #[test]
    fn system_clock_hour_is_in_range() {
        assert!(SystemClock.local_hour() < 24);
    }
}

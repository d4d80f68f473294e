// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Manually driven clock.

use qrlogic_engine::Clock;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// [`Clock`] that only moves when told to.
///
/// Clones share state, so a test can keep one handle while the engine owns
/// another.
///
/// # Example
///
/// ```
/// use qrlogic_dry_tests::ManualClock;
/// use qrlogic_engine::Clock;
/// use std::time::Duration;
///
/// let clock = ManualClock::at_hour(12);
/// let start = clock.now();
/// clock.advance(Duration::from_millis(500));
/// assert_eq!(clock.now() - start, Duration::from_millis(500));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualClockInner>>,
}

#[derive(Debug)]
struct ManualClockInner {
    now: Instant,
    hour: u32,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at_hour(12)
    }
}

impl ManualClock {
    /// Clock frozen at the current instant, reporting `hour` as local time.
    pub fn at_hour(hour: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualClockInner {
                now: Instant::now(),
                hour: hour % 24,
            })),
        }
    }

    /// Move monotonic time forward.
    pub fn advance(&self, by: Duration) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.now += by;
    }

    /// Change the reported local hour.
    pub fn set_hour(&self, hour: u32) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.hour = hour % 24;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).now
    }

    fn local_hour(&self) -> u32 {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).hour
    }
}

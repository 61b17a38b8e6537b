// src/common/test_support.rs

//! Mocks shared by the unit tests of several modules.

use super::hal_traits::Timer;
use core::time::Duration;

// --- Mock Instant ---
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MockInstant(pub u64);

impl core::ops::Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

// --- Mock Timer ---
/// Clock that only moves when somebody delays on it.
#[derive(Debug, Default, Clone)]
pub struct MockTimer {
    pub current_time_us: u64,
    pub delay_calls: u32,
}

impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_time(&mut self, us: u64) {
        self.current_time_us += us;
    }
}

impl Timer for MockTimer {
    type Instant = MockInstant;

    fn now(&self) -> MockInstant {
        MockInstant(self.current_time_us)
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_calls += 1;
        self.current_time_us += us as u64;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_calls += 1;
        self.current_time_us += ms as u64 * 1000;
    }
}

// src/app/blink.rs

use embedded_hal::digital::OutputPin;

/// Number of distinct blink speeds; advancing past the last wraps to 0.
pub const BLINK_SPEEDS: u8 = 3;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedCommand {
    On,
    Off,
}

/// Heartbeat LED pattern, stepped once per application tick.
///
/// | speed | on when          | off when      |
/// |-------|------------------|---------------|
/// | 0     | `count % 8 == 4` | `count % 8 == 0` |
/// | 1     | `count % 4 == 2` | `count % 4 == 0` |
/// | 2     | count even       | count odd     |
#[derive(Debug, Default, Clone)]
pub struct BlinkSchedule {
    speed: u8,
    count: u32,
}

impl BlinkSchedule {
    pub const fn new() -> Self {
        BlinkSchedule { speed: 0, count: 0 }
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// Moves to the next speed. The wrap back to 0 happens on the following tick.
    pub fn advance_speed(&mut self) {
        self.speed = self.speed.saturating_add(1);
    }

    /// Advances one tick and returns what the LED should do, if anything.
    pub fn tick(&mut self) -> Option<LedCommand> {
        self.count = self.count.wrapping_add(1);
        match self.speed {
            0 => match self.count % 8 {
                4 => Some(LedCommand::On),
                0 => Some(LedCommand::Off),
                _ => None,
            },
            1 => match self.count % 4 {
                2 => Some(LedCommand::On),
                0 => Some(LedCommand::Off),
                _ => None,
            },
            2 => Some(if self.count % 2 == 0 { LedCommand::On } else { LedCommand::Off }),
            _ => {
                self.speed = 0;
                None
            }
        }
    }

    /// `tick` and apply the result to `led`.
    pub fn drive<P: OutputPin>(&mut self, led: &mut P) -> Result<(), P::Error> {
        match self.tick() {
            Some(LedCommand::On) => led.set_high(),
            Some(LedCommand::Off) => led.set_low(),
            None => Ok(()),
        }
    }
}

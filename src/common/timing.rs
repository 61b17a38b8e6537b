// src/common/timing.rs

use core::time::Duration;

// Nominal values. The serial port runs 115200 8N1 and the EEPROM bus runs
// at 100 kHz on the reference board; nothing here depends on those rates.

// === Serial transmit ===

/// Upper bound for one blocking transmission of a whole reply.
pub const UART_BLOCKING_TIMEOUT: Duration = Duration::from_millis(1000);
/// Pause after starting a queued transmission before the caller continues.
pub const UART_QUEUED_SETTLE: Duration = Duration::from_millis(100);

// === I2C / EEPROM ===

/// Timeout handed to the transport for blocking current-address receives.
pub const I2C_RECEIVE_TIMEOUT: Duration = Duration::from_millis(100);
/// Internal write cycle of the AT24C family (datasheet t_WR max).
pub const EEPROM_COMMIT_TIME: Duration = Duration::from_millis(10);
/// Upper bound for waiting on the transport to report ready.
pub const I2C_READY_TIMEOUT: Duration = Duration::from_millis(250);
/// Spacing between readiness polls.
pub const POLL_INTERVAL: Duration = Duration::from_micros(100);


// src/common/config.rs

use super::address::OffsetWidth;
use super::timing;
use core::time::Duration;

/// How replies leave the console UART.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmitMode {
    /// Poll each byte out, bounded by `ConsoleConfig::blocking_timeout`.
    #[default]
    Blocking,
    /// Hand the whole reply to the port's interrupt/DMA machinery and settle briefly.
    Queued,
}

/// Console behaviour.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub transmit_mode: TransmitMode,
    /// Pause after starting a queued transmission.
    pub settle_delay: Duration,
    /// Budget for one blocking transmission.
    pub blocking_timeout: Duration,
    /// Sent once by `Console::greet`.
    pub banner: &'static str,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            transmit_mode: TransmitMode::Blocking,
            settle_delay: timing::UART_QUEUED_SETTLE,
            blocking_timeout: timing::UART_BLOCKING_TIMEOUT,
            banner: "Serial Command Interpreter v0.01\r\n\r\n",
        }
    }
}

/// EEPROM transaction engine behaviour and device geometry.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Longest wait for the transport to become ready.
    pub ready_timeout: Duration,
    /// Spacing between readiness polls.
    pub poll_interval: Duration,
    /// Minimum quiet time after a write before the same device is addressed again.
    /// `None` relies on the transport reporting `DeviceBusyWait` instead.
    pub commit_guard: Option<Duration>,
    pub offset_width: OffsetWidth,
    /// Device page size in bytes.
    pub page_size: usize,
    /// Device size in bytes.
    pub capacity: u32,
    /// Refuse transfers that would wrap inside their page.
    pub strict_paging: bool,
    /// Toggle the activity indicator on every readiness poll.
    pub toggle_indicator: bool,
}

impl EngineConfig {
    /// 32 KiB AT24C256: 64-byte pages, 16-bit offsets.
    pub fn at24c256() -> Self {
        Self {
            ready_timeout: timing::I2C_READY_TIMEOUT,
            poll_interval: timing::POLL_INTERVAL,
            commit_guard: Some(timing::EEPROM_COMMIT_TIME),
            offset_width: OffsetWidth::Two,
            page_size: 64,
            capacity: 32 * 1024,
            strict_paging: false,
            toggle_indicator: true,
        }
    }

    /// 128-byte EEPROM emulated by a small microcontroller: one page, 8-bit offsets.
    pub fn pic_emulator() -> Self {
        Self {
            offset_width: OffsetWidth::One,
            page_size: 128,
            capacity: 128,
            ..Self::at24c256()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::at24c256()
    }
}

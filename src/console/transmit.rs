// src/console/transmit.rs

use crate::common::{
    config::{ConsoleConfig, TransmitMode},
    error::Error,
    hal_traits::{SerialPort, Timer},
    io_helpers::execute_blocking_io_until,
    timing,
};
use core::time::Duration;

/// Sends reply text in blocking or queued mode.
pub struct Transmitter<S, TM>
where
    S: SerialPort,
    TM: Timer,
{
    serial: S,
    timer: TM,
    mode: TransmitMode,
    settle_delay: Duration,
    blocking_timeout: Duration,
}

impl<S, TM> Transmitter<S, TM>
where
    S: SerialPort,
    TM: Timer,
{
    pub fn new(serial: S, timer: TM, config: &ConsoleConfig) -> Self {
        Transmitter {
            serial,
            timer,
            mode: config.transmit_mode,
            settle_delay: config.settle_delay,
            blocking_timeout: config.blocking_timeout,
        }
    }

    pub fn mode(&self) -> TransmitMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TransmitMode) {
        self.mode = mode;
    }

    pub fn serial(&mut self) -> &mut S {
        &mut self.serial
    }

    pub fn timer(&mut self) -> &mut TM {
        &mut self.timer
    }

    pub fn release(self) -> (S, TM) {
        (self.serial, self.timer)
    }

    /// Sends `text` in the configured mode.
    pub fn send(&mut self, text: &str) -> Result<(), Error<S::Error>> {
        match self.mode {
            TransmitMode::Blocking => self.send_blocking(text.as_bytes()),
            TransmitMode::Queued => self.send_queued(text.as_bytes()),
        }
    }

    /// Writes every byte and flushes, all within one `blocking_timeout` budget.
    pub fn send_blocking(&mut self, bytes: &[u8]) -> Result<(), Error<S::Error>> {
        let deadline = self.timer.now() + self.blocking_timeout;
        let serial = &mut self.serial;
        for &byte in bytes {
            execute_blocking_io_until(&mut self.timer, deadline, timing::POLL_INTERVAL, || serial.write_byte(byte))
                .inspect_err(|_| log::warn!("blocking transmit of {} bytes failed", bytes.len()))?;
        }
        execute_blocking_io_until(&mut self.timer, deadline, timing::POLL_INTERVAL, || serial.flush())
    }

    /// Hands `bytes` to the port's background transmitter, then waits the settle delay.
    pub fn send_queued(&mut self, bytes: &[u8]) -> Result<(), Error<S::Error>> {
        if self.serial.is_transmitting() {
            log::debug!("queued transmit refused, previous still draining");
            return Err(Error::TransmitInProgress);
        }
        self.serial.start_queued(bytes)?;
        self.timer.delay_us(self.settle_delay.as_micros() as u32);
        Ok(())
    }
}

// src/common/hal_traits.rs

use super::address::{DeviceAddress, OffsetWidth};
use super::error::TransferStatus;
use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// A point in time from a monotonic clock.
pub trait Instant: Copy + Ord + Add<Duration, Output = Self> + Sub<Self, Output = Duration> {}

impl<T> Instant for T where T: Copy + Ord + Add<Duration, Output = T> + Sub<T, Output = Duration> {}

/// Abstraction for timer/delay operations.
pub trait Timer {
    type Instant: Instant;

    /// Current time from a monotonic clock.
    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1000);
        }
    }
}

/// Abstraction for the console UART.
pub trait SerialPort {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Ok(byte)` if a byte was read, or `Err(nb::Error::WouldBlock)`
    /// if no byte is available yet.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the transmit register is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;

    /// Starts an interrupt or DMA driven transmission of `bytes` and returns at once.
    ///
    /// The implementation copies or otherwise takes ownership of the bytes before
    /// returning; the caller's slice is not borrowed for the life of the transfer.
    fn start_queued(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// True while a transmission started with [`SerialPort::start_queued`] is still draining.
    fn is_transmitting(&self) -> bool;
}

/// Observable state of a non-blocking I2C peripheral.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cState {
    /// Nothing started since reset.
    Idle,
    /// The bus is free but the addressed device is still committing a write.
    DeviceBusyWait,
    /// A transfer is on the bus.
    InFlight,
    /// The last transfer finished with this status.
    Complete(TransferStatus),
}

impl I2cState {
    /// A new transfer may be started.
    #[inline]
    pub const fn is_ready(&self) -> bool {
        matches!(self, I2cState::Idle | I2cState::Complete(_))
    }
}

/// Abstraction for a memory-addressed I2C master with non-blocking transfers.
///
/// `start_*` return as soon as the transfer is accepted; completion is observed
/// by polling [`I2cTransport::state`].
pub trait I2cTransport {
    type Error: Debug;

    fn state(&mut self) -> I2cState;

    /// Starts writing `data` at `offset` of `device`.
    fn start_mem_write(
        &mut self,
        device: DeviceAddress,
        offset: u16,
        width: OffsetWidth,
        data: &[u8],
    ) -> Result<(), Self::Error>;

    /// Starts reading `len` bytes from `offset` of `device` into the transport's own buffer.
    fn start_mem_read(
        &mut self,
        device: DeviceAddress,
        offset: u16,
        width: OffsetWidth,
        len: usize,
    ) -> Result<(), Self::Error>;

    /// Copies the bytes of the last completed read into `buffer`, returning how many were copied.
    fn take_received(&mut self, buffer: &mut [u8]) -> usize;

    /// Blocking receive from the device's current address pointer.
    fn receive(&mut self, device: DeviceAddress, buffer: &mut [u8], timeout: Duration) -> Result<(), Self::Error>;

    /// True if `error` means the transport refused to start because it was busy.
    fn is_busy(error: &Self::Error) -> bool {
        let _ = error;
        false
    }
}

/// Something that can be flipped to show activity, usually an LED.
pub trait Indicator {
    fn toggle(&mut self);
}

/// Indicator that does nothing.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoIndicator;

impl Indicator for NoIndicator {
    #[inline]
    fn toggle(&mut self) {}
}

/// Adapts any `embedded_hal` stateful output pin into an [`Indicator`].
#[derive(Debug)]
pub struct PinIndicator<P>(pub P);

impl<P: embedded_hal::digital::StatefulOutputPin> Indicator for PinIndicator<P> {
    fn toggle(&mut self) {
        // A failed LED toggle is not worth aborting a bus wait for.
        if self.0.toggle().is_err() {
            log::trace!("indicator toggle failed");
        }
    }
}

/// Read-only access to 32-bit words of the processor address space.
pub trait MemoryPeek {
    /// Returns the word at `address`, or `None` if the address may not be read.
    fn peek_u32(&mut self, address: u32) -> Option<u32>;
}

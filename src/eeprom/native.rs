// src/eeprom/native.rs

//! [`I2cTransport`] over any blocking `embedded-hal` 1.0 I2C bus.
//!
//! Each `start_*` call runs the whole transfer before returning, so the state
//! is always ready afterwards. Write-commit time is covered by the engine's
//! commit guard, since a blocking bus cannot report `DeviceBusyWait`.

use super::layout::MAX_PAGE_SIZE;
use crate::common::address::{DeviceAddress, OffsetWidth};
use crate::common::error::TransferStatus;
use crate::common::hal_traits::{I2cState, I2cTransport};
use arrayvec::ArrayVec;
use core::time::Duration;
use embedded_hal::i2c::I2c;

/// Largest write frame: two offset bytes plus one page.
pub const MAX_FRAME_LEN: usize = 2 + MAX_PAGE_SIZE;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NativeError<E> {
    /// Error from the underlying bus.
    Bus(E),
    /// Transfer larger than the adapter's staging buffers.
    TooLong(usize),
}

impl<E> From<E> for NativeError<E> {
    fn from(e: E) -> Self {
        NativeError::Bus(e)
    }
}

pub struct NativeI2c<I2C> {
    bus: I2C,
    state: I2cState,
    rx: [u8; MAX_PAGE_SIZE],
    rx_len: usize,
}

impl<I2C: I2c> NativeI2c<I2C> {
    pub fn new(bus: I2C) -> Self {
        NativeI2c { bus, state: I2cState::Idle, rx: [0; MAX_PAGE_SIZE], rx_len: 0 }
    }

    pub fn release(self) -> I2C {
        self.bus
    }

    fn finish<T, E>(&mut self, result: Result<T, E>) -> Result<T, NativeError<E>> {
        self.state = I2cState::Complete(if result.is_ok() { TransferStatus::Ok } else { TransferStatus::Error });
        result.map_err(NativeError::Bus)
    }
}

impl<I2C: I2c> I2cTransport for NativeI2c<I2C> {
    type Error = NativeError<I2C::Error>;

    fn state(&mut self) -> I2cState {
        self.state
    }

    fn start_mem_write(
        &mut self,
        device: DeviceAddress,
        offset: u16,
        width: OffsetWidth,
        data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut scratch = [0u8; 2];
        let mut frame: ArrayVec<u8, MAX_FRAME_LEN> = ArrayVec::new();
        frame
            .try_extend_from_slice(width.encode(offset, &mut scratch))
            .and_then(|_| frame.try_extend_from_slice(data))
            .map_err(|_| NativeError::TooLong(data.len()))?;
        let result = self.bus.write(device.as_u8(), &frame);
        self.finish(result)
    }

    fn start_mem_read(
        &mut self,
        device: DeviceAddress,
        offset: u16,
        width: OffsetWidth,
        len: usize,
    ) -> Result<(), Self::Error> {
        if len > MAX_PAGE_SIZE {
            return Err(NativeError::TooLong(len));
        }
        let mut scratch = [0u8; 2];
        let prefix = width.encode(offset, &mut scratch);
        let result = self.bus.write_read(device.as_u8(), prefix, &mut self.rx[..len]);
        self.rx_len = if result.is_ok() { len } else { 0 };
        self.finish(result)
    }

    fn take_received(&mut self, buffer: &mut [u8]) -> usize {
        let n = self.rx_len.min(buffer.len());
        buffer[..n].copy_from_slice(&self.rx[..n]);
        self.rx_len = 0;
        n
    }

    fn receive(&mut self, device: DeviceAddress, buffer: &mut [u8], _timeout: Duration) -> Result<(), Self::Error> {
        // The bus driver owns its own timeout.
        let result = self.bus.read(device.as_u8(), buffer);
        self.finish(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::EngineConfig;
    use crate::common::test_support::MockTimer;
    use crate::eeprom::engine::EepromEngine;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    struct MockBusError;

    impl embedded_hal::i2c::Error for MockBusError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        }
    }

    /// AT24C256 on a blocking bus.
    struct MockBus {
        address: u8,
        memory: [u8; 1024],
        pointer: usize,
        transactions: u32,
    }

    impl ErrorType for MockBus {
        type Error = MockBusError;
    }

    impl I2c for MockBus {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            if address != self.address {
                return Err(MockBusError);
            }
            self.transactions += 1;
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => {
                        let (offset, data) = bytes.split_at(2.min(bytes.len()));
                        if offset.len() == 2 {
                            self.pointer = u16::from_be_bytes([offset[0], offset[1]]) as usize % 1024;
                        }
                        for &b in data {
                            self.memory[self.pointer] = b;
                            self.pointer = (self.pointer + 1) % 1024;
                        }
                    }
                    Operation::Read(buffer) => {
                        for b in buffer.iter_mut() {
                            *b = self.memory[self.pointer];
                            self.pointer = (self.pointer + 1) % 1024;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    fn bus() -> MockBus {
        MockBus { address: 0x50, memory: [0xFF; 1024], pointer: 0, transactions: 0 }
    }

    #[test]
    fn test_write_then_read() {
        let mut native = NativeI2c::new(bus());
        native
            .start_mem_write(DeviceAddress::A0A1_00, 0x0102, OffsetWidth::Two, &[7, 8, 9])
            .unwrap();
        assert_eq!(native.state(), I2cState::Complete(TransferStatus::Ok));

        native.start_mem_read(DeviceAddress::A0A1_00, 0x0102, OffsetWidth::Two, 3).unwrap();
        let mut out = [0u8; 3];
        assert_eq!(native.take_received(&mut out), 3);
        assert_eq!(out, [7, 8, 9]);
        assert_eq!(native.release().transactions, 2);
    }

    #[test]
    fn test_bus_error_marks_failed() {
        let mut native = NativeI2c::new(bus());
        let err = native.start_mem_read(DeviceAddress::A0A1_01, 0, OffsetWidth::Two, 1);
        assert_eq!(err, Err(NativeError::Bus(MockBusError)));
        assert_eq!(native.state(), I2cState::Complete(TransferStatus::Error));
        assert_eq!(native.take_received(&mut [0u8; 1]), 0);
    }

    #[test]
    fn test_oversized_transfer() {
        let mut native = NativeI2c::new(bus());
        let big = [0u8; MAX_PAGE_SIZE + 1];
        assert_eq!(
            native.start_mem_write(DeviceAddress::A0A1_00, 0, OffsetWidth::Two, &big),
            Err(NativeError::TooLong(MAX_PAGE_SIZE + 1))
        );
        assert_eq!(native.start_mem_read(DeviceAddress::A0A1_00, 0, OffsetWidth::Two, 200), Err(NativeError::TooLong(200)));
    }

    #[test]
    fn test_engine_over_native_bus() {
        let mut engine = EepromEngine::new(NativeI2c::new(bus()), MockTimer::new(), EngineConfig::at24c256());
        engine.write_random(DeviceAddress::A0A1_00, 0x10, &[0xDE, 0xAD]).unwrap();
        assert_eq!(engine.read_byte(DeviceAddress::A0A1_00, 0x11).unwrap(), 0xAD);
        // Pointer sits after the byte just read.
        assert_eq!(engine.read_current(DeviceAddress::A0A1_00).unwrap(), 0xFF);
        // The commit guard was honoured before the read.
        assert!(engine.timer().current_time_us >= 10_000);
    }
}

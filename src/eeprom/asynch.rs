// src/eeprom/asynch.rs

//! Awaitable EEPROM access over `embedded-hal-async`.
//!
//! Waiting for the bus is the executor's job here; the only explicit wait left
//! is the write-commit guard, which is awaited on the supplied delay.

use super::engine::{validate_span, validate_transfer, SpanChunks};
use super::native::MAX_FRAME_LEN;
use crate::common::{address::DeviceAddress, config::EngineConfig, error::Error};
use arrayvec::ArrayVec;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

pub struct AsyncEeprom<I2C, D> {
    bus: I2C,
    delay: D,
    config: EngineConfig,
}

impl<I2C, D> AsyncEeprom<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(bus: I2C, delay: D, config: EngineConfig) -> Self {
        AsyncEeprom { bus, delay, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn release(self) -> (I2C, D) {
        (self.bus, self.delay)
    }

    pub async fn read_current(&mut self, device: DeviceAddress) -> Result<u8, Error<I2C::Error>> {
        let mut byte = [0u8; 1];
        self.bus.read(device.as_u8(), &mut byte).await?;
        Ok(byte[0])
    }

    pub async fn read_random(
        &mut self,
        device: DeviceAddress,
        offset: u16,
        buffer: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        validate_transfer(&self.config, offset, buffer.len()).map_err(Error::widen)?;
        let mut scratch = [0u8; 2];
        let prefix = self.config.offset_width.encode(offset, &mut scratch);
        self.bus.write_read(device.as_u8(), prefix, buffer).await?;
        Ok(())
    }

    /// Writes `data` at `offset` and awaits the commit guard before returning.
    pub async fn write_random(&mut self, device: DeviceAddress, offset: u16, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        validate_transfer(&self.config, offset, data.len()).map_err(Error::widen)?;
        let mut scratch = [0u8; 2];
        let mut frame: ArrayVec<u8, MAX_FRAME_LEN> = ArrayVec::new();
        frame
            .try_extend_from_slice(self.config.offset_width.encode(offset, &mut scratch))
            .and_then(|_| frame.try_extend_from_slice(data))
            .map_err(|_| Error::BufferOverflow { needed: data.len() + 2, got: MAX_FRAME_LEN })?;
        log::trace!("async write {} bytes at {:#06x} to {}", data.len(), offset, device);
        self.bus.write(device.as_u8(), &frame).await?;
        if let Some(guard) = self.config.commit_guard {
            self.delay.delay_us(guard.as_micros() as u32).await;
        }
        Ok(())
    }

    pub async fn write_spanning(&mut self, device: DeviceAddress, offset: u16, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        validate_span(&self.config, offset, data.len()).map_err(Error::widen)?;
        let mut at = offset;
        for (start, end) in SpanChunks::new(offset, data.len(), self.config.page_size) {
            self.write_random(device, at, &data[start..end]).await?;
            at = at.wrapping_add((end - start) as u16);
        }
        Ok(())
    }

    pub async fn read_spanning(
        &mut self,
        device: DeviceAddress,
        offset: u16,
        buffer: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        validate_span(&self.config, offset, buffer.len()).map_err(Error::widen)?;
        let mut at = offset;
        for (start, end) in SpanChunks::new(offset, buffer.len(), self.config.page_size) {
            self.read_random(device, at, &mut buffer[start..end]).await?;
            at = at.wrapping_add((end - start) as u16);
        }
        Ok(())
    }
}

// src/eeprom/engine.rs

use super::layout::{EepromAddress, PageBuffer};
use crate::common::{
    address::DeviceAddress,
    config::EngineConfig,
    error::{Error, TransferStatus},
    hal_traits::{I2cState, I2cTransport, Indicator, NoIndicator, Timer},
    io_helpers::{delay_until, execute_blocking_io_with_timeout},
    timing,
};
use core::fmt::Debug;

/// Checks one single-page transfer against the device geometry.
pub(crate) fn validate_transfer(config: &EngineConfig, offset: u16, len: usize) -> Result<EepromAddress, Error<()>> {
    let address = EepromAddress::new(offset)?;
    let limit = config.capacity.min(config.offset_width.max_offset() + 1);
    if u32::from(offset) >= limit {
        return Err(Error::AddressOutOfRange(u32::from(offset)));
    }
    if len == 0 || len > config.page_size {
        return Err(Error::InvalidLength(len));
    }
    if config.strict_paging && address.wraps(len, config.page_size) {
        return Err(Error::PageOverrun);
    }
    Ok(address)
}

/// Checks that `len` bytes from `offset` stay inside the device, for multi-page transfers.
pub(crate) fn validate_span(config: &EngineConfig, offset: u16, len: usize) -> Result<(), Error<()>> {
    if len == 0 {
        return Err(Error::InvalidLength(0));
    }
    let end = u32::from(offset) + len as u32;
    let limit = config.capacity.min(config.offset_width.max_offset() + 1);
    if end > limit {
        return Err(Error::AddressOutOfRange(end - 1));
    }
    Ok(())
}

#[derive(Debug, Copy, Clone)]
struct PendingCommit<I> {
    device: DeviceAddress,
    // First instant the bus was seen idle after the write.
    settled_at: Option<I>,
}

/// Serialises EEPROM transfers over a non-blocking I2C transport.
///
/// Every transfer first waits (bounded by `EngineConfig::ready_timeout`) until
/// the transport reports ready, so no bytes are put on the bus while a previous
/// transfer or write commit is in progress. Writes return once started; their
/// completion is observed by the next transfer, by [`EepromEngine::flush`], or
/// through [`EepromEngine::last_status`].
pub struct EepromEngine<T, TM, IND = NoIndicator>
where
    T: I2cTransport,
    TM: Timer,
    IND: Indicator,
{
    transport: T,
    timer: TM,
    indicator: IND,
    config: EngineConfig,
    pending_commit: Option<PendingCommit<TM::Instant>>,
    last_status: Option<TransferStatus>,
}

impl<T, TM> EepromEngine<T, TM, NoIndicator>
where
    T: I2cTransport,
    TM: Timer,
{
    pub fn new(transport: T, timer: TM, config: EngineConfig) -> Self {
        Self::with_indicator(transport, timer, NoIndicator, config)
    }
}

impl<T, TM, IND> EepromEngine<T, TM, IND>
where
    T: I2cTransport,
    T::Error: Debug,
    TM: Timer,
    IND: Indicator,
{
    pub fn with_indicator(transport: T, timer: TM, indicator: IND, config: EngineConfig) -> Self {
        EepromEngine {
            transport,
            timer,
            indicator,
            config,
            pending_commit: None,
            last_status: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn timer(&mut self) -> &mut TM {
        &mut self.timer
    }

    pub fn indicator(&mut self) -> &mut IND {
        &mut self.indicator
    }

    /// Consumes the engine, handing back its parts.
    pub fn release(self) -> (T, TM, IND) {
        (self.transport, self.timer, self.indicator)
    }

    /// Completion status most recently observed on the transport.
    pub fn last_status(&self) -> Option<TransferStatus> {
        self.last_status
    }

    /// Polls the transport until it is ready, toggling the indicator on every
    /// unready poll when configured to.
    pub fn wait_ready(&mut self) -> Result<I2cState, Error<T::Error>> {
        let toggle = self.config.toggle_indicator;
        let transport = &mut self.transport;
        let indicator = &mut self.indicator;
        let state = execute_blocking_io_with_timeout(
            &mut self.timer,
            self.config.ready_timeout,
            self.config.poll_interval,
            || {
                let state = transport.state();
                if state.is_ready() {
                    Ok(state)
                } else {
                    if toggle {
                        indicator.toggle();
                    }
                    Err(nb::Error::WouldBlock)
                }
            },
        )
        .inspect_err(|_| log::warn!("I2C transport not ready within {:?}", self.config.ready_timeout))?;

        if let I2cState::Complete(status) = state {
            self.last_status = Some(status);
        }
        if let Some(pending) = self.pending_commit.as_mut() {
            if pending.settled_at.is_none() {
                pending.settled_at = Some(self.timer.now());
            }
        }
        Ok(state)
    }

    /// Waits for any transfer in progress and reports how it ended.
    pub fn flush(&mut self) -> Result<(), Error<T::Error>> {
        match self.wait_ready()? {
            I2cState::Complete(status) if status != TransferStatus::Ok => Err(Error::TransferFailed(status)),
            _ => Ok(()),
        }
    }

    // Honours the commit window of a previous write. Reads and writes to the
    // written device wait it out; a write to another device does too, so only
    // one device is ever committing.
    fn guard_commit(&mut self, device: DeviceAddress, is_write: bool) {
        let pending = match self.pending_commit {
            Some(pending) => pending,
            None => return,
        };
        if pending.device != device && !is_write {
            return;
        }
        if let (Some(guard), Some(settled_at)) = (self.config.commit_guard, pending.settled_at) {
            delay_until(&mut self.timer, settled_at + guard);
        }
        self.pending_commit = None;
    }

    // A busy refusal becomes `Error::Busy`, anything else stays a transport error.
    fn refused(error: T::Error) -> Error<T::Error> {
        if T::is_busy(&error) {
            log::debug!("transport refused transfer, still busy");
            Error::Busy
        } else {
            Error::Io(error)
        }
    }

    fn prepare(&mut self, device: DeviceAddress, is_write: bool) -> Result<(), Error<T::Error>> {
        self.wait_ready()?;
        self.guard_commit(device, is_write);
        Ok(())
    }

    /// One byte from the device's internal address counter.
    pub fn read_current(&mut self, device: DeviceAddress) -> Result<u8, Error<T::Error>> {
        let mut byte = [0u8; 1];
        self.read_sequential_from_current(device, &mut byte)?;
        Ok(byte[0])
    }

    /// `buffer.len()` bytes from the device's internal address counter onwards.
    pub fn read_sequential_from_current(
        &mut self,
        device: DeviceAddress,
        buffer: &mut [u8],
    ) -> Result<(), Error<T::Error>> {
        if buffer.is_empty() {
            return Err(Error::InvalidLength(0));
        }
        self.prepare(device, false)?;
        log::trace!("current-address read of {} bytes from {}", buffer.len(), device);
        let result = self
            .transport
            .receive(device, buffer, timing::I2C_RECEIVE_TIMEOUT)
            .map_err(Self::refused);
        self.last_status = Some(TransferStatus::from(&result));
        result
    }

    /// Reads `buffer.len()` bytes at `offset`, waiting for the transfer to finish.
    pub fn read_random(&mut self, device: DeviceAddress, offset: u16, buffer: &mut [u8]) -> Result<(), Error<T::Error>> {
        validate_transfer(&self.config, offset, buffer.len()).map_err(Error::widen)?;
        self.prepare(device, false)?;
        log::trace!("read {} bytes at {:#06x} from {}", buffer.len(), offset, device);
        self.transport
            .start_mem_read(device, offset, self.config.offset_width, buffer.len())
            .map_err(Self::refused)?;
        self.flush()?;
        let got = self.transport.take_received(buffer);
        if got < buffer.len() {
            return Err(Error::BufferOverflow { needed: buffer.len(), got });
        }
        Ok(())
    }

    /// Starts writing `data` at `offset`. Returns as soon as the transport accepted it.
    pub fn write_random(&mut self, device: DeviceAddress, offset: u16, data: &[u8]) -> Result<(), Error<T::Error>> {
        let address = validate_transfer(&self.config, offset, data.len()).map_err(Error::widen)?;
        if address.wraps(data.len(), self.config.page_size) {
            log::debug!("write of {} bytes at {:#06x} wraps inside its page", data.len(), offset);
        }
        self.prepare(device, true)?;
        log::trace!("write {} bytes at {:#06x} to {}", data.len(), offset, device);
        self.transport
            .start_mem_write(device, offset, self.config.offset_width, data)
            .map_err(Self::refused)?;
        self.pending_commit = Some(PendingCommit { device, settled_at: None });
        Ok(())
    }

    pub fn write_byte(&mut self, device: DeviceAddress, offset: u16, value: u8) -> Result<(), Error<T::Error>> {
        self.write_random(device, offset, &[value])
    }

    pub fn read_byte(&mut self, device: DeviceAddress, offset: u16) -> Result<u8, Error<T::Error>> {
        let mut byte = [0u8; 1];
        self.read_random(device, offset, &mut byte)?;
        Ok(byte[0])
    }

    /// Writes the used part of `page` at `offset`.
    pub fn write_page(&mut self, device: DeviceAddress, offset: u16, page: &PageBuffer) -> Result<(), Error<T::Error>> {
        self.write_random(device, offset, page.as_slice())
    }

    /// Fills the used part of `page` from `offset`.
    pub fn read_page(&mut self, device: DeviceAddress, offset: u16, page: &mut PageBuffer) -> Result<(), Error<T::Error>> {
        self.read_random(device, offset, page.as_mut_slice())
    }

    /// Writes `data` of any length, split at page boundaries.
    pub fn write_spanning(&mut self, device: DeviceAddress, offset: u16, data: &[u8]) -> Result<(), Error<T::Error>> {
        validate_span(&self.config, offset, data.len()).map_err(Error::widen)?;
        let page_size = self.config.page_size;
        let mut at = offset;
        for (start, end) in SpanChunks::new(offset, data.len(), page_size) {
            self.write_random(device, at, &data[start..end])?;
            at = at.wrapping_add((end - start) as u16);
        }
        Ok(())
    }

    /// Reads into `buffer` of any length, split at page boundaries.
    pub fn read_spanning(&mut self, device: DeviceAddress, offset: u16, buffer: &mut [u8]) -> Result<(), Error<T::Error>> {
        validate_span(&self.config, offset, buffer.len()).map_err(Error::widen)?;
        let page_size = self.config.page_size;
        let mut at = offset;
        for (start, end) in SpanChunks::new(offset, buffer.len(), page_size) {
            self.read_random(device, at, &mut buffer[start..end])?;
            at = at.wrapping_add((end - start) as u16);
        }
        Ok(())
    }
}

/// Splits `[0, len)` of a transfer starting at `offset` into page-bounded ranges.
pub(crate) struct SpanChunks {
    offset: usize,
    done: usize,
    len: usize,
    page_size: usize,
}

impl SpanChunks {
    pub(crate) fn new(offset: u16, len: usize, page_size: usize) -> Self {
        SpanChunks { offset: offset as usize, done: 0, len, page_size }
    }
}

impl Iterator for SpanChunks {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done >= self.len {
            return None;
        }
        let room = self.page_size - (self.offset + self.done) % self.page_size;
        let n = room.min(self.len - self.done);
        let chunk = (self.done, self.done + n);
        self.done += n;
        Some(chunk)
    }
}

// src/eeprom/sim.rs

//! In-memory EEPROM behind a non-blocking I2C transport.
//!
//! Models the parts of the AT24C family that matter to the engine: in-page
//! wrap of writes and random reads, the internal address counter used by
//! current-address reads, a bus phase and a commit phase measured in state
//! polls, and NACKs.

use crate::common::address::{DeviceAddress, OffsetWidth};
use crate::common::error::TransferStatus;
use crate::common::hal_traits::{I2cState, I2cTransport};
use crate::eeprom::layout::EepromAddress;
use core::time::Duration;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimError {
    /// Wrong device address or offset width.
    Nack,
    /// A transfer was started before the previous one finished.
    Busy,
    /// More bytes than one page.
    Overrun,
    /// Offset beyond the end of the memory.
    OutOfRange,
}

/// Counters for asserting on bus behaviour.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct SimStats {
    pub writes: u32,
    pub reads: u32,
    pub receives: u32,
    pub state_polls: u32,
    pub starts_while_busy: u32,
}

pub struct SimulatedEeprom<const CAPACITY: usize, const PAGE: usize> {
    memory: [u8; CAPACITY],
    device: DeviceAddress,
    width: OffsetWidth,
    cursor: usize,
    state: I2cState,
    rx: [u8; PAGE],
    rx_len: usize,
    in_flight_polls: u32,
    commit_polls: u32,
    remaining_in_flight: u32,
    remaining_commit: u32,
    nack_next: bool,
    failing: bool,
    stats: SimStats,
}

/// 32 KiB AT24C256, 64-byte pages.
pub type At24c256Sim = SimulatedEeprom<32768, 64>;
/// 128-byte single-page device with one-byte offsets.
pub type PicEepromSim = SimulatedEeprom<128, 128>;

impl<const CAPACITY: usize, const PAGE: usize> SimulatedEeprom<CAPACITY, PAGE> {
    /// Erased device (all 0xFF) answering at `device`. Devices up to 256 bytes
    /// take one offset byte, larger ones two.
    pub fn new(device: DeviceAddress) -> Self {
        SimulatedEeprom {
            memory: [0xFF; CAPACITY],
            device,
            width: if CAPACITY > 256 { OffsetWidth::Two } else { OffsetWidth::One },
            cursor: 0,
            state: I2cState::Idle,
            rx: [0; PAGE],
            rx_len: 0,
            in_flight_polls: 0,
            commit_polls: 0,
            remaining_in_flight: 0,
            remaining_commit: 0,
            nack_next: false,
            failing: false,
            stats: SimStats::default(),
        }
    }

    /// Number of polls a transfer stays on the bus, and a write stays in its commit phase.
    pub fn with_latency(mut self, in_flight_polls: u32, commit_polls: u32) -> Self {
        self.in_flight_polls = in_flight_polls;
        self.commit_polls = commit_polls;
        self
    }

    /// The next started transfer completes with `TransferStatus::Error` and has no effect.
    pub fn inject_nack(&mut self) {
        self.nack_next = true;
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    /// Internal address counter.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn stats(&self) -> SimStats {
        self.stats
    }

    fn begin(&mut self, device: DeviceAddress, offset: u16, width: OffsetWidth, len: usize) -> Result<EepromAddress, SimError> {
        if !self.state.is_ready() {
            self.stats.starts_while_busy += 1;
            return Err(SimError::Busy);
        }
        if device != self.device || width != self.width {
            return Err(SimError::Nack);
        }
        if len > PAGE {
            return Err(SimError::Overrun);
        }
        let start = EepromAddress::new(offset)
            .ok()
            .filter(|start| usize::from(start.as_u16()) < CAPACITY)
            .ok_or(SimError::OutOfRange)?;
        self.failing = core::mem::take(&mut self.nack_next);
        self.state = I2cState::InFlight;
        self.remaining_in_flight = self.in_flight_polls;
        Ok(start)
    }
}

impl<const CAPACITY: usize, const PAGE: usize> I2cTransport for SimulatedEeprom<CAPACITY, PAGE> {
    type Error = SimError;

    fn state(&mut self) -> I2cState {
        self.stats.state_polls += 1;
        match self.state {
            I2cState::InFlight => {
                if self.remaining_in_flight > 0 {
                    self.remaining_in_flight -= 1;
                } else if self.failing {
                    self.failing = false;
                    self.state = I2cState::Complete(TransferStatus::Error);
                } else if self.remaining_commit > 0 {
                    self.state = I2cState::DeviceBusyWait;
                } else {
                    self.state = I2cState::Complete(TransferStatus::Ok);
                }
            }
            I2cState::DeviceBusyWait => {
                self.remaining_commit = self.remaining_commit.saturating_sub(1);
                if self.remaining_commit == 0 {
                    self.state = I2cState::Complete(TransferStatus::Ok);
                }
            }
            I2cState::Idle | I2cState::Complete(_) => {}
        }
        self.state
    }

    fn start_mem_write(
        &mut self,
        device: DeviceAddress,
        offset: u16,
        width: OffsetWidth,
        data: &[u8],
    ) -> Result<(), Self::Error> {
        let start = self.begin(device, offset, width, data.len())?;
        self.stats.writes += 1;
        if self.failing {
            return Ok(());
        }
        for (i, &b) in data.iter().enumerate() {
            self.memory[start.wrapped(i, PAGE)] = b;
        }
        self.cursor = start.wrapped(data.len(), PAGE);
        self.remaining_commit = self.commit_polls;
        Ok(())
    }

    fn start_mem_read(
        &mut self,
        device: DeviceAddress,
        offset: u16,
        width: OffsetWidth,
        len: usize,
    ) -> Result<(), Self::Error> {
        let start = self.begin(device, offset, width, len)?;
        self.stats.reads += 1;
        self.remaining_commit = 0;
        if self.failing {
            self.rx_len = 0;
            return Ok(());
        }
        for i in 0..len {
            self.rx[i] = self.memory[start.wrapped(i, PAGE)];
        }
        self.rx_len = len;
        self.cursor = start.wrapped(len, PAGE);
        Ok(())
    }

    fn take_received(&mut self, buffer: &mut [u8]) -> usize {
        let n = self.rx_len.min(buffer.len());
        buffer[..n].copy_from_slice(&self.rx[..n]);
        self.rx_len = 0;
        n
    }

    fn receive(&mut self, device: DeviceAddress, buffer: &mut [u8], _timeout: Duration) -> Result<(), Self::Error> {
        if !self.state.is_ready() {
            return Err(SimError::Busy);
        }
        if device != self.device {
            return Err(SimError::Nack);
        }
        self.stats.receives += 1;
        // Current-address reads roll over the whole memory, not the page.
        for b in buffer.iter_mut() {
            *b = self.memory[self.cursor];
            self.cursor = (self.cursor + 1) % CAPACITY;
        }
        Ok(())
    }

    fn is_busy(error: &SimError) -> bool {
        matches!(error, SimError::Busy)
    }
}

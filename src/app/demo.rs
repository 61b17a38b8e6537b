// src/app/demo.rs

use crate::common::{address::DeviceAddress, error::Error, hal_traits::{I2cTransport, Indicator, Timer}};
use crate::eeprom::{EepromEngine, PageBuffer};
use core::fmt::Debug;

/// Bytes moved by each demo step, starting at offset 0.
pub const DEMO_LEN: usize = 128;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DemoMode {
    /// Clear the local buffer and read the device back into it.
    ReadBack,
    /// Write a cleared buffer to the device, then read it back.
    ClearAndVerify,
}

/// Button-driven EEPROM exercise that alternates between its two modes.
#[derive(Debug, Clone)]
pub struct DemoSequencer {
    device: DeviceAddress,
    mode: DemoMode,
    buffer: PageBuffer,
}

impl DemoSequencer {
    pub fn new(device: DeviceAddress) -> Self {
        let mut buffer = PageBuffer::new();
        // DEMO_LEN fits the buffer.
        let _ = buffer.set_len(DEMO_LEN);
        DemoSequencer { device, mode: DemoMode::ReadBack, buffer }
    }

    /// Mode the next `step` will run.
    pub fn mode(&self) -> DemoMode {
        self.mode
    }

    /// Bytes from the last read.
    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Runs the current mode and moves to the other one. On error the mode is kept.
    pub fn step<T, TM, IND>(&mut self, engine: &mut EepromEngine<T, TM, IND>) -> Result<DemoMode, Error<T::Error>>
    where
        T: I2cTransport,
        T::Error: Debug,
        TM: Timer,
        IND: Indicator,
    {
        let ran = self.mode;
        self.buffer.clear();
        match ran {
            DemoMode::ReadBack => {
                engine.read_spanning(self.device, 0, self.buffer.as_mut_slice())?;
                self.mode = DemoMode::ClearAndVerify;
            }
            DemoMode::ClearAndVerify => {
                engine.write_spanning(self.device, 0, self.buffer.as_slice())?;
                engine.read_spanning(self.device, 0, self.buffer.as_mut_slice())?;
                self.mode = DemoMode::ReadBack;
            }
        }
        log::info!("demo step {:?} done on {}", ran, self.device);
        Ok(ran)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::EngineConfig;
    use crate::common::test_support::MockTimer;
    use crate::eeprom::{At24c256Sim, PicEepromSim};

    #[test]
    fn test_modes_alternate_on_pic() {
        let dev = DeviceAddress::PIC_EMULATOR;
        let mut sim = PicEepromSim::new(dev).with_latency(2, 4);
        sim.memory_mut()[5] = 0x42;
        let mut engine = EepromEngine::new(sim, MockTimer::new(), EngineConfig::pic_emulator());
        let mut demo = DemoSequencer::new(dev);

        assert_eq!(demo.step(&mut engine).unwrap(), DemoMode::ReadBack);
        assert_eq!(demo.buffer().len(), DEMO_LEN);
        assert_eq!(demo.buffer()[5], 0x42);
        assert_eq!(demo.buffer()[0], 0xFF);

        assert_eq!(demo.step(&mut engine).unwrap(), DemoMode::ClearAndVerify);
        assert!(demo.buffer().iter().all(|&b| b == 0));
        assert!(engine.transport().memory().iter().all(|&b| b == 0));
        assert_eq!(demo.mode(), DemoMode::ReadBack);
    }

    #[test]
    fn test_spans_pages_on_at24() {
        let dev = DeviceAddress::A0A1_00;
        let mut engine = EepromEngine::new(At24c256Sim::new(dev), MockTimer::new(), EngineConfig::at24c256());
        let mut demo = DemoSequencer::new(dev);
        demo.step(&mut engine).unwrap();
        demo.step(&mut engine).unwrap();
        let stats = engine.transport().stats();
        // 128 bytes over 64-byte pages.
        assert_eq!(stats.writes, 2);
        assert_eq!(stats.reads, 4);
        assert_eq!(stats.starts_while_busy, 0);
    }

    #[test]
    fn test_failed_step_keeps_mode() {
        let dev = DeviceAddress::PIC_EMULATOR;
        let mut engine = EepromEngine::new(PicEepromSim::new(dev), MockTimer::new(), EngineConfig::pic_emulator());
        engine.transport().inject_nack();
        let mut demo = DemoSequencer::new(dev);
        assert!(demo.step(&mut engine).is_err());
        assert_eq!(demo.mode(), DemoMode::ReadBack);
    }
}

// src/eeprom/mod.rs

//! Paged I2C EEPROM access (AT24C family and small emulated devices).

pub mod engine;
pub mod layout;
pub mod native;
pub mod sim;

#[cfg(feature = "async")]
pub mod asynch;

pub use engine::EepromEngine;
pub use layout::{EepromAddress, FillPattern, PageBuffer, AT24C256_PAGE_SIZE, MAX_EEPROM_ADDRESS, MAX_PAGE_SIZE};
pub use native::{NativeError, NativeI2c};
pub use sim::{At24c256Sim, PicEepromSim, SimError, SimStats, SimulatedEeprom};

#[cfg(feature = "async")]
pub use asynch::AsyncEeprom;

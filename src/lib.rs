// src/lib.rs

#![no_std] // Specify no_std at the crate root

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod app;
pub mod command;
pub mod common;
pub mod console;
pub mod eeprom;

// Re-export key types for convenience
pub use command::{CommandResponse, Dispatcher};
pub use common::{DeviceAddress, Error, TransferStatus};
pub use console::Console;
pub use eeprom::EepromEngine;

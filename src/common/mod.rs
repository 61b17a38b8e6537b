// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod config;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod io_helpers;
pub mod numeric;
pub mod timing;

#[cfg(test)]
pub(crate) mod test_support;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::{DeviceAddress, OffsetWidth};

// From config.rs
pub use config::{ConsoleConfig, EngineConfig, TransmitMode};

// From error.rs
pub use error::{Error, FormatError, TransferStatus};

// From frame.rs
pub use frame::{CommandLine, FrameAssembler, LineChannel, LineConsumer, LineProducer};

// From hal_traits.rs
pub use hal_traits::{I2cState, I2cTransport, Indicator, MemoryPeek, NoIndicator, PinIndicator, SerialPort, Timer};

// From numeric.rs
pub use numeric::{format_hex, format_unsigned, parse_auto, parse_unsigned, DataWidth, Radix};

// From timing.rs (constants - users can access via common::timing::*)

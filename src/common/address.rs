// src/common/address.rs

use super::error::Error;
use core::convert::TryFrom;
use core::fmt;

/// 7-bit I2C device address.
///
/// HAL drivers in the STM32 family expect the address already shifted into
/// the upper seven bits; [`DeviceAddress::hal_address`] produces that form.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceAddress(u8);

impl DeviceAddress {
    /// AT24C EEPROM with A1=0, A0=0.
    pub const A0A1_00: DeviceAddress = DeviceAddress(0x50);
    /// AT24C EEPROM with A1=0, A0=1.
    pub const A0A1_01: DeviceAddress = DeviceAddress(0x51);
    /// AT24C EEPROM with A1=1, A0=0.
    pub const A0A1_10: DeviceAddress = DeviceAddress(0x52);
    /// AT24C EEPROM with A1=1, A0=1.
    pub const A0A1_11: DeviceAddress = DeviceAddress(0x53);
    /// Microcontroller emulating a small EEPROM with one-byte offsets.
    pub const PIC_EMULATOR: DeviceAddress = DeviceAddress(0x08);

    /// Creates a new `DeviceAddress` if the value fits in seven bits.
    pub fn new(address: u8) -> Result<Self, Error<()>> {
        if Self::is_valid(address) {
            Ok(DeviceAddress(address))
        } else {
            Err(Error::InvalidDeviceAddress(address))
        }
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Address shifted left by one, as written on the wire before the R/W bit.
    #[inline]
    pub const fn hal_address(&self) -> u8 {
        self.0 << 1
    }

    #[inline]
    pub const fn is_valid(address: u8) -> bool {
        address <= 0x7F
    }
}

impl Default for DeviceAddress {
    fn default() -> Self {
        Self::A0A1_00
    }
}

impl TryFrom<u8> for DeviceAddress {
    type Error = Error<()>;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeviceAddress> for u8 {
    fn from(value: DeviceAddress) -> Self {
        value.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// Width of the memory offset sent after the device address.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OffsetWidth {
    /// Single offset byte (small emulated devices).
    One,
    /// Big-endian 16-bit offset (AT24C32 and up).
    #[default]
    Two,
}

impl OffsetWidth {
    #[inline]
    pub const fn bytes(&self) -> usize {
        match self {
            OffsetWidth::One => 1,
            OffsetWidth::Two => 2,
        }
    }

    /// Largest offset expressible in this width.
    #[inline]
    pub const fn max_offset(&self) -> u32 {
        match self {
            OffsetWidth::One => 0xFF,
            OffsetWidth::Two => 0xFFFF,
        }
    }

    /// Encodes `offset` in wire order into `out`, returning the used prefix.
    pub fn encode(self, offset: u16, out: &mut [u8; 2]) -> &[u8] {
        *out = offset.to_be_bytes();
        &out[2 - self.bytes()..]
    }
}

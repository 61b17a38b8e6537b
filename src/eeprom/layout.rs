// src/eeprom/layout.rs

//! Address and page arithmetic for paged serial EEPROMs.

use crate::common::error::Error;

/// Highest byte offset of a 32 KiB device.
pub const MAX_EEPROM_ADDRESS: u16 = 0x7FFF;
/// AT24C256 page size.
pub const AT24C256_PAGE_SIZE: usize = 64;
/// Largest page the engine and buffers handle.
pub const MAX_PAGE_SIZE: usize = 128;

/// Byte offset inside a 32 KiB EEPROM.
///
/// For the AT24C256 the upper nine bits select one of 512 pages and the lower
/// six bits the byte within the page. Writes that run past the end of a page
/// wrap to the start of the same page.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EepromAddress(u16);

impl EepromAddress {
    pub fn new(offset: u16) -> Result<Self, Error<()>> {
        if offset <= MAX_EEPROM_ADDRESS {
            Ok(EepromAddress(offset))
        } else {
            Err(Error::AddressOutOfRange(u32::from(offset)))
        }
    }

    #[inline]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// AT24C256 page number (upper nine bits).
    #[inline]
    pub const fn page(&self) -> u16 {
        self.0 >> 6
    }

    /// AT24C256 byte within page (lower six bits).
    #[inline]
    pub const fn in_page(&self) -> u8 {
        (self.0 & 0x3F) as u8
    }

    /// `(page, byte within page)` for an arbitrary page size.
    #[inline]
    pub const fn split(&self, page_size: usize) -> (usize, usize) {
        (self.0 as usize / page_size, self.0 as usize % page_size)
    }

    /// Bytes left in this page, counting this one.
    #[inline]
    pub const fn page_room(&self, page_size: usize) -> usize {
        page_size - self.0 as usize % page_size
    }

    /// True if `len` bytes starting here would wrap inside the page.
    #[inline]
    pub const fn wraps(&self, len: usize, page_size: usize) -> bool {
        len > self.page_room(page_size)
    }

    /// Offset of the `i`th byte of a transfer starting here, with in-page wrap.
    #[inline]
    pub const fn wrapped(&self, i: usize, page_size: usize) -> usize {
        let (page, in_page) = self.split(page_size);
        page * page_size + (in_page + i) % page_size
    }
}

impl TryFrom<u16> for EepromAddress {
    type Error = Error<()>;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Test patterns for [`PageBuffer::fill`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FillPattern {
    Zeros,
    Ones,
    /// `buf[i] = i`
    Index,
    /// `buf[i] = len - 1 - i`
    ReverseIndex,
}

/// Staging buffer for one page transfer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PageBuffer {
    data: [u8; MAX_PAGE_SIZE],
    used: usize,
}

impl PageBuffer {
    /// Empty buffer with every byte zeroed.
    pub const fn new() -> Self {
        PageBuffer { data: [0; MAX_PAGE_SIZE], used: 0 }
    }

    /// Sets the used length to `len` and fills it with `pattern`.
    pub fn fill(&mut self, pattern: FillPattern, len: usize) -> Result<(), Error<()>> {
        self.set_len(len)?;
        for (i, b) in self.data[..len].iter_mut().enumerate() {
            *b = match pattern {
                FillPattern::Zeros => 0x00,
                FillPattern::Ones => 0xFF,
                FillPattern::Index => i as u8,
                FillPattern::ReverseIndex => (len - 1 - i) as u8,
            };
        }
        Ok(())
    }

    pub fn set_len(&mut self, len: usize) -> Result<(), Error<()>> {
        if len > MAX_PAGE_SIZE {
            return Err(Error::BufferOverflow { needed: len, got: MAX_PAGE_SIZE });
        }
        self.used = len;
        Ok(())
    }

    /// Zeroes the whole buffer; the used length is kept.
    pub fn clear(&mut self) {
        self.data = [0; MAX_PAGE_SIZE];
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.used]
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..self.used]
    }
}

impl Default for PageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_split() {
        let a = EepromAddress::new(3 * 64 + 60).unwrap();
        assert_eq!(a.page(), 3);
        assert_eq!(a.in_page(), 60);
        assert_eq!(a.split(64), (3, 60));
        assert_eq!(a.page_room(64), 4);
        assert!(a.wraps(10, 64));
        assert!(!a.wraps(4, 64));
        assert_eq!(a.wrapped(3, 64), 3 * 64 + 63);
        assert_eq!(a.wrapped(4, 64), 3 * 64);
    }

    #[test]
    fn test_address_range() {
        assert!(EepromAddress::new(0x7FFF).is_ok());
        assert!(matches!(EepromAddress::new(0x8000), Err(Error::AddressOutOfRange(0x8000))));
        assert!(EepromAddress::try_from(0xFFFF).is_err());
    }

    #[test]
    fn test_fill_patterns() {
        let mut buf = PageBuffer::new();
        buf.fill(FillPattern::ReverseIndex, 64).unwrap();
        assert_eq!(buf.len(), 64);
        assert_eq!(buf.as_slice()[0], 63);
        assert_eq!(buf.as_slice()[63], 0);

        buf.fill(FillPattern::Index, 128).unwrap();
        assert_eq!(buf.as_slice()[127], 127);

        buf.fill(FillPattern::Ones, 2).unwrap();
        assert_eq!(buf.as_slice(), &[0xFF, 0xFF]);

        assert!(matches!(
            buf.fill(FillPattern::Zeros, 129),
            Err(Error::BufferOverflow { needed: 129, got: 128 })
        ));
    }

    #[test]
    fn test_clear_keeps_length() {
        let mut buf = PageBuffer::new();
        buf.fill(FillPattern::Ones, 16).unwrap();
        buf.clear();
        assert_eq!(buf.len(), 16);
        assert!(buf.as_slice().iter().all(|&b| b == 0));
    }
}

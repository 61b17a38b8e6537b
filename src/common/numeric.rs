// src/common/numeric.rs

//! Unsigned 32-bit integer <-> ASCII text in decimal or `0x`-prefixed hex.
//!
//! Parsing is strict: optional leading whitespace, then digits up to the end
//! of the text. Anything trailing is an error.

use super::error::FormatError;
use arrayvec::ArrayString;

/// Longest decimal rendering of a `u32`.
pub const MAX_DECIMAL_DIGITS: usize = 10;
/// Longest hex rendering of a `u32`, without prefix.
pub const MAX_HEX_DIGITS: usize = 8;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Radix {
    Decimal,
    Hex,
}

/// Field width that decides hex zero padding.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataWidth {
    Bits8,
    Bits16,
    Bits32,
}

impl DataWidth {
    #[inline]
    pub const fn hex_digits(&self) -> usize {
        match self {
            DataWidth::Bits8 => 2,
            DataWidth::Bits16 => 4,
            DataWidth::Bits32 => 8,
        }
    }
}

#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Parses `text` as an unsigned 32-bit value in the given radix.
pub fn parse_unsigned(text: &str, radix: Radix) -> Result<u32, FormatError> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(|b| !is_space(*b)).unwrap_or(bytes.len());
    let digits = &bytes[start..];
    match radix {
        Radix::Decimal => parse_decimal(digits),
        Radix::Hex => parse_hex(digits),
    }
}

/// Tries hex first, then decimal. The decimal error is reported when both fail.
pub fn parse_auto(text: &str) -> Result<u32, FormatError> {
    parse_unsigned(text, Radix::Hex).or_else(|_| parse_unsigned(text, Radix::Decimal))
}

fn parse_decimal(digits: &[u8]) -> Result<u32, FormatError> {
    if digits.is_empty() {
        return Err(FormatError::Empty);
    }
    let mut value: u64 = 0;
    for (i, &b) in digits.iter().enumerate() {
        if i == MAX_DECIMAL_DIGITS {
            return Err(FormatError::TooManyDigits);
        }
        if !b.is_ascii_digit() {
            return Err(FormatError::InvalidCharacter(b));
        }
        value = value * 10 + u64::from(b - b'0');
    }
    u32::try_from(value).map_err(|_| FormatError::Overflow)
}

fn parse_hex(digits: &[u8]) -> Result<u32, FormatError> {
    if digits.is_empty() {
        return Err(FormatError::Empty);
    }
    let rest = match digits {
        [b'0', b'x' | b'X', rest @ ..] => rest,
        _ => return Err(FormatError::MissingHexPrefix),
    };
    if rest.is_empty() {
        return Err(FormatError::Empty);
    }
    let mut value: u32 = 0;
    for (i, &b) in rest.iter().enumerate() {
        if i == MAX_HEX_DIGITS {
            return Err(FormatError::TooManyDigits);
        }
        let digit = (b as char).to_digit(16).ok_or(FormatError::InvalidCharacter(b))?;
        value = (value << 4) | digit;
    }
    Ok(value)
}

/// Renders `value`; hex output is uppercase, unprefixed and padded to eight digits.
pub fn format_unsigned(value: u32, radix: Radix) -> ArrayString<MAX_DECIMAL_DIGITS> {
    match radix {
        Radix::Decimal => render(value, 10, 1),
        Radix::Hex => render(value, 16, DataWidth::Bits32.hex_digits()),
    }
}

/// Uppercase hex padded to `width`. Values wider than `width` are not truncated.
pub fn format_hex(value: u32, width: DataWidth) -> ArrayString<MAX_DECIMAL_DIGITS> {
    render(value, 16, width.hex_digits())
}

fn render(mut value: u32, base: u32, min_digits: usize) -> ArrayString<MAX_DECIMAL_DIGITS> {
    let mut scratch = [b'0'; MAX_DECIMAL_DIGITS];
    let mut len = 0;
    loop {
        let digit = (value % base) as u8;
        scratch[len] = if digit < 10 { b'0' + digit } else { b'A' + digit - 10 };
        len += 1;
        value /= base;
        if value == 0 {
            break;
        }
    }
    // Remaining scratch is already '0'.
    let len = len.max(min_digits);

    let mut out = ArrayString::new();
    for &b in scratch[..len].iter().rev() {
        out.push(b as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_unsigned("0", Radix::Decimal), Ok(0));
        assert_eq!(parse_unsigned("255", Radix::Decimal), Ok(255));
        assert_eq!(parse_unsigned("  \t42", Radix::Decimal), Ok(42));
        assert_eq!(parse_unsigned("4294967295", Radix::Decimal), Ok(u32::MAX));
        assert_eq!(parse_unsigned("0000000007", Radix::Decimal), Ok(7));
        let seven = parse_unsigned("0000000007", Radix::Decimal).unwrap();
        assert_eq!(format_unsigned(seven, Radix::Decimal).as_str(), "7");
    }

    #[test]
    fn test_parse_decimal_rejects() {
        assert_eq!(parse_unsigned("", Radix::Decimal), Err(FormatError::Empty));
        assert_eq!(parse_unsigned("   ", Radix::Decimal), Err(FormatError::Empty));
        assert_eq!(parse_unsigned("42 ", Radix::Decimal), Err(FormatError::InvalidCharacter(b' ')));
        assert_eq!(parse_unsigned("-1", Radix::Decimal), Err(FormatError::InvalidCharacter(b'-')));
        assert_eq!(parse_unsigned("4294967296", Radix::Decimal), Err(FormatError::Overflow));
        assert_eq!(parse_unsigned("12345678901", Radix::Decimal), Err(FormatError::TooManyDigits));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_unsigned("0x1F", Radix::Hex), Ok(0x1F));
        assert_eq!(parse_unsigned("0Xff", Radix::Hex), Ok(0xFF));
        assert_eq!(parse_unsigned(" 0xFFFFFFFF", Radix::Hex), Ok(u32::MAX));
        assert_eq!(parse_unsigned("0x00000000", Radix::Hex), Ok(0));
    }

    #[test]
    fn test_parse_hex_rejects() {
        assert_eq!(parse_unsigned("1F", Radix::Hex), Err(FormatError::MissingHexPrefix));
        assert_eq!(parse_unsigned("0x", Radix::Hex), Err(FormatError::Empty));
        assert_eq!(parse_unsigned("0x1G", Radix::Hex), Err(FormatError::InvalidCharacter(b'G')));
        assert_eq!(parse_unsigned("0x123456789", Radix::Hex), Err(FormatError::TooManyDigits));
    }

    #[test]
    fn test_parse_auto() {
        assert_eq!(parse_auto("0x20"), Ok(32));
        assert_eq!(parse_auto("20"), Ok(20));
        assert_eq!(parse_auto("0"), Ok(0));
        assert_eq!(parse_auto("x20"), Err(FormatError::InvalidCharacter(b'x')));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_unsigned(5, Radix::Hex).as_str(), "00000005");
        assert_eq!(format_unsigned(0xDEADBEEF, Radix::Hex).as_str(), "DEADBEEF");
        assert_eq!(format_unsigned(0, Radix::Decimal).as_str(), "0");
        assert_eq!(format_unsigned(u32::MAX, Radix::Decimal).as_str(), "4294967295");
        assert_eq!(format_hex(0xAB, DataWidth::Bits8).as_str(), "AB");
        assert_eq!(format_hex(0x9, DataWidth::Bits16).as_str(), "0009");
        assert_eq!(format_hex(0x1234, DataWidth::Bits8).as_str(), "1234");
    }

    #[test]
    fn test_round_trip() {
        for &value in &[0u32, 9, 10, 255, 0x8000_0000, u32::MAX] {
            let dec = format_unsigned(value, Radix::Decimal);
            assert_eq!(parse_unsigned(&dec, Radix::Decimal), Ok(value));

            let mut hex: ArrayString<12> = ArrayString::new();
            hex.push_str("0x");
            hex.push_str(&format_unsigned(value, Radix::Hex));
            assert_eq!(parse_unsigned(&hex, Radix::Hex), Ok(value));
        }
    }
}

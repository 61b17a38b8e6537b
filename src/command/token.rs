// src/command/token.rs

//! Lexical split of a command line into token, bracketed index and `=` payload.
//!
//! Line grammar: `<TOKEN>[<index>]=<payload>`. All three parts are optional and
//! the token is everything before the first `[`.

use crate::common::error::FormatError;
use crate::common::numeric::parse_auto;
use arrayvec::ArrayVec;
use core::str;

/// Only the first five token characters are kept.
pub const MAX_TOKEN_LEN: usize = 5;

/// Outcome of looking for a `[...]` index.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IndexField {
    /// No `[` in the line.
    Absent,
    /// Brackets present but the content is not an unsigned 32-bit number starting with a digit.
    Malformed,
    Value(u32),
}

impl IndexField {
    #[inline]
    pub fn value(&self) -> Option<u32> {
        match self {
            IndexField::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// The pieces of one command line.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Tokens {
    /// Uppercased, truncated token.
    pub token: ArrayVec<u8, MAX_TOKEN_LEN>,
    pub index: IndexField,
    /// Text after the first `=`, parsed hex-then-decimal.
    pub payload: Option<Result<u32, FormatError>>,
    /// Length of the whole line.
    pub line_len: usize,
}

impl Tokens {
    #[inline]
    pub fn token(&self) -> &[u8] {
        &self.token
    }

    /// First token character, if any.
    #[inline]
    pub fn letter(&self) -> Option<u8> {
        self.token.first().copied()
    }
}

pub fn tokenize(line: &[u8]) -> Tokens {
    let open = line.iter().position(|&b| b == b'[');
    let token_end = open.unwrap_or(line.len());

    let mut token = ArrayVec::new();
    for &b in line[..token_end].iter().take(MAX_TOKEN_LEN) {
        token.push(b.to_ascii_uppercase());
    }

    Tokens {
        token,
        index: open.map_or(IndexField::Absent, |at| index_after(&line[at + 1..])),
        payload: payload(line),
        line_len: line.len(),
    }
}

// `rest` starts right after the opening bracket.
fn index_after(rest: &[u8]) -> IndexField {
    let close = match rest.iter().position(|&b| b == b']') {
        Some(close) => close,
        None => return IndexField::Malformed,
    };
    let inner = &rest[..close];
    match inner.first() {
        Some(b) if b.is_ascii_digit() => {}
        _ => return IndexField::Malformed,
    }
    match str::from_utf8(inner).ok().map(parse_auto) {
        Some(Ok(value)) => IndexField::Value(value),
        _ => IndexField::Malformed,
    }
}

fn payload(line: &[u8]) -> Option<Result<u32, FormatError>> {
    let eq = line.iter().position(|&b| b == b'=')?;
    let text = &line[eq + 1..];
    Some(match str::from_utf8(text) {
        Ok(text) => parse_auto(text),
        Err(e) => Err(FormatError::InvalidCharacter(text[e.valid_up_to()])),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_index_payload() {
        let t = tokenize(b"d[0x10]=200");
        assert_eq!(t.token(), b"D");
        assert_eq!(t.index, IndexField::Value(16));
        assert_eq!(t.payload, Some(Ok(200)));
        assert_eq!(t.line_len, 11);
    }

    #[test]
    fn test_token_only() {
        let t = tokenize(b"ss");
        assert_eq!(t.token(), b"SS");
        assert_eq!(t.index, IndexField::Absent);
        assert_eq!(t.payload, None);
    }

    #[test]
    fn test_token_truncated() {
        let t = tokenize(b"abcdefgh[1]");
        assert_eq!(t.token(), b"ABCDE");
        assert_eq!(t.index, IndexField::Value(1));
    }

    #[test]
    fn test_malformed_index() {
        assert_eq!(tokenize(b"c[]").index, IndexField::Malformed);
        assert_eq!(tokenize(b"c[x1]").index, IndexField::Malformed);
        assert_eq!(tokenize(b"c[ 1]").index, IndexField::Malformed);
        assert_eq!(tokenize(b"c[12").index, IndexField::Malformed);
        assert_eq!(tokenize(b"c[99999999999]").index, IndexField::Malformed);
    }

    #[test]
    fn test_first_bracket_pair_wins() {
        let t = tokenize(b"c[3]=[7]");
        assert_eq!(t.index, IndexField::Value(3));
        assert_eq!(t.payload, Some(Err(FormatError::InvalidCharacter(b'['))));
    }

    #[test]
    fn test_payload_forms() {
        assert_eq!(tokenize(b"d[1]= 0xFF").payload, Some(Ok(255)));
        assert_eq!(tokenize(b"d[1]=").payload, Some(Err(FormatError::Empty)));
        assert_eq!(tokenize(b"d[1]=12a").payload, Some(Err(FormatError::InvalidCharacter(b'a'))));
        assert_eq!(tokenize(&[b'd', b'=', 0xFF]).payload, Some(Err(FormatError::InvalidCharacter(0xFF))));
    }

    #[test]
    fn test_empty_line() {
        let t = tokenize(b"");
        assert!(t.token().is_empty());
        assert_eq!(t.letter(), None);
        assert_eq!(t.index, IndexField::Absent);
    }
}

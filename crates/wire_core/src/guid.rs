//! # Component Type Identifiers
//!
//! 128-bit identifiers that key component types across the process and across
//! serialized entity files.
//!
//! The textual form is the usual hyphenated hex layout, optionally wrapped in
//! braces:
//!
//! ```text
//! 6A2347FD-8CB4-431D-8599-AF7340755113
//! {6A2347FD-8CB4-431D-8599-AF7340755113}
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::GuidParseError;

/// Length of the hyphenated form without braces.
const CANONICAL_LEN: usize = 36;

/// Byte positions of the hyphens in the canonical form.
const HYPHENS: [usize; 4] = [8, 13, 18, 23];

/// A 128-bit component type identifier.
///
/// Ordering compares the high half first, then the low half.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Guid {
    hi: u64,
    lo: u64,
}

impl Guid {
    /// The null identifier. Never a valid component registration.
    pub const NULL: Self = Self { hi: 0, lo: 0 };

    /// Creates an identifier from its two halves.
    #[inline]
    #[must_use]
    pub const fn from_parts(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    /// Packs the classic `(d1, d2, d3, d4[8])` layout into two halves.
    ///
    /// `d3` occupies the top 16 bits of the high half, `d2` the next 16 and
    /// `d1` the low 32. `d4[0]` is the least significant byte of the low half.
    #[must_use]
    pub const fn construct(d1: u32, d2: u16, d3: u16, d4: [u8; 8]) -> Self {
        let hi = ((d3 as u64) << 48) | ((d2 as u64) << 32) | (d1 as u64);
        let mut lo = 0u64;
        let mut i = 0;
        while i < 8 {
            lo |= (d4[i] as u64) << (8 * i);
            i += 1;
        }
        Self { hi, lo }
    }

    /// Parses the textual form at compile time.
    ///
    /// Intended for `const` items:
    ///
    /// ```
    /// use wire_core::Guid;
    ///
    /// const POSITION: Guid = Guid::parse("{6A2347FD-8CB4-431D-8599-AF7340755113}");
    /// assert!(!POSITION.is_null());
    /// ```
    ///
    /// # Panics
    ///
    /// Panics (a compile error in const context) if `text` is malformed.
    /// Use [`str::parse`] for untrusted input.
    #[must_use]
    pub const fn parse(text: &str) -> Self {
        match Self::parse_bytes(text.as_bytes()) {
            Ok(guid) => guid,
            Err(_) => panic!("malformed GUID literal"),
        }
    }

    /// Returns the high 64 bits.
    #[inline]
    #[must_use]
    pub const fn hi(self) -> u64 {
        self.hi
    }

    /// Returns the low 64 bits.
    #[inline]
    #[must_use]
    pub const fn lo(self) -> u64 {
        self.lo
    }

    /// Checks if this is the null identifier.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.hi == 0 && self.lo == 0
    }

    const fn parse_bytes(bytes: &[u8]) -> Result<Self, GuidParseError> {
        let start = if bytes.len() == CANONICAL_LEN + 2 {
            if bytes[0] != b'{' || bytes[CANONICAL_LEN + 1] != b'}' {
                return Err(GuidParseError::UnbalancedBraces);
            }
            1
        } else if bytes.len() == CANONICAL_LEN {
            0
        } else {
            return Err(GuidParseError::InvalidLength(bytes.len()));
        };

        let mut i = 0;
        while i < HYPHENS.len() {
            if bytes[start + HYPHENS[i]] != b'-' {
                return Err(GuidParseError::MissingHyphen(HYPHENS[i]));
            }
            i += 1;
        }

        let d1 = match hex_value(bytes, start, 8) {
            Ok(v) => v as u32,
            Err(e) => return Err(e),
        };
        let d2 = match hex_value(bytes, start + 9, 4) {
            Ok(v) => v as u16,
            Err(e) => return Err(e),
        };
        let d3 = match hex_value(bytes, start + 14, 4) {
            Ok(v) => v as u16,
            Err(e) => return Err(e),
        };

        // The last two groups are eight individual bytes.
        const D4_OFFSETS: [usize; 8] = [19, 21, 24, 26, 28, 30, 32, 34];
        let mut d4 = [0u8; 8];
        let mut k = 0;
        while k < 8 {
            d4[k] = match hex_value(bytes, start + D4_OFFSETS[k], 2) {
                Ok(v) => v as u8,
                Err(e) => return Err(e),
            };
            k += 1;
        }

        Ok(Self::construct(d1, d2, d3, d4))
    }
}

const fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

const fn hex_value(bytes: &[u8], at: usize, digits: usize) -> Result<u64, GuidParseError> {
    let mut value = 0u64;
    let mut i = 0;
    while i < digits {
        match hex_digit(bytes[at + i]) {
            Some(d) => value = (value << 4) | d as u64,
            None => return Err(GuidParseError::InvalidDigit(at + i)),
        }
        i += 1;
    }
    Ok(value)
}

impl FromStr for Guid {
    type Err = GuidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_bytes(s.as_bytes())
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d1 = self.hi as u32;
        let d2 = (self.hi >> 32) as u16;
        let d3 = (self.hi >> 48) as u16;
        let d4 = self.lo.to_le_bytes();
        write!(
            f,
            "{d1:08X}-{d2:04X}-{d3:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}",
            d4[0], d4[1], d4[2], d4[3], d4[4], d4[5], d4[6], d4[7]
        )
    }
}

//! Identifier codec.
//!
//! Every object, class, string, stack-frame and thread reference in a dump
//! is an opaque identifier whose width (4 or 8 bytes) the header declares
//! once for the whole file. Identifiers are unsigned: a 4-byte id is
//! zero-extended to u64, never sign-extended.

use std::io::Read;

use crate::bytestream::ByteReader;
use crate::{Error, Result};

/// Identifier width as declared in the dump header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSize {
    U4,
    U8,
}

impl IdSize {
    /// Validates the header's raw u4 identifier-size field.
    pub fn from_raw(raw: u32) -> Result<Self> {
        match raw {
            4 => Ok(Self::U4),
            8 => Ok(Self::U8),
            other => Err(Error::InvalidIdSize(other)),
        }
    }

    /// Encoded width of one identifier in bytes.
    #[inline]
    pub fn in_bytes(self) -> u64 {
        match self {
            Self::U4 => 4,
            Self::U8 => 8,
        }
    }

    /// Reads one identifier at this width.
    ///
    /// Die 4-Byte-Variante liest u32 und weitet mit Nullen auf: `FF FF FF FF`
    /// ergibt 4294967295, nicht -1.
    #[inline]
    pub fn read_id<R: Read>(self, reader: &mut ByteReader<R>) -> Result<u64> {
        match self {
            Self::U4 => Ok(u64::from(reader.read_u32()?)),
            Self::U8 => reader.read_u64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_accepts_4_and_8() {
        assert_eq!(IdSize::from_raw(4).unwrap(), IdSize::U4);
        assert_eq!(IdSize::from_raw(8).unwrap(), IdSize::U8);
    }

    #[test]
    fn from_raw_rejects_other_widths() {
        for raw in [0u32, 1, 2, 6, 16, u32::MAX] {
            assert_eq!(IdSize::from_raw(raw).unwrap_err(), Error::InvalidIdSize(raw));
        }
    }

    /// 4-byte ids must zero-extend, never sign-extend.
    #[test]
    fn u4_id_zero_extends() {
        let data: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let mut r = ByteReader::new(data);
        assert_eq!(IdSize::U4.read_id(&mut r).unwrap(), 4_294_967_295);
    }

    #[test]
    fn u8_id_reads_full_width() {
        let data: &[u8] = &[0x80, 0, 0, 0, 0, 0, 0, 0x01];
        let mut r = ByteReader::new(data);
        assert_eq!(IdSize::U8.read_id(&mut r).unwrap(), 0x8000_0000_0000_0001);
    }

    #[test]
    fn in_bytes_matches_width() {
        assert_eq!(IdSize::U4.in_bytes(), 4);
        assert_eq!(IdSize::U8.in_bytes(), 8);
    }
}

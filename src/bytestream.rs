//! Big-endian byte cursor over an arbitrary `io::Read`.
//!
//! HPROF is a byte-oriented big-endian format (hprof_b_spec): u1/u2/u4/u8
//! primitives plus identifier-width fields. The reader keeps a running byte
//! position so callers can account consumed bytes exactly against declared
//! record lengths and segment budgets.

use std::io::Read;

use crate::{Error, Result};

/// Big-endian primitive reader with exact position tracking.
///
/// Alle Lese-Methoden mappen ein vorzeitiges Stream-Ende auf
/// [`Error::UnexpectedEof`]; nur [`try_read_u8`](Self::try_read_u8)
/// behandelt EOF als regulären Zustand (Record-Grenze).
pub struct ByteReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> ByteReader<R> {
    /// Creates a reader starting at position 0.
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Number of bytes consumed so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads exactly `buf.len()` bytes.
    #[inline]
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf)?;
        self.position += buf.len() as u64;
        Ok(())
    }

    /// Reads `len` bytes into a fresh buffer.
    ///
    /// `len` kommt aus nicht vertrauenswürdigen Längenfeldern; gelesen wird
    /// in Stücken, damit eine absurde Länge erst am Stream-Ende scheitert
    /// statt vorab Gigabytes zu reservieren.
    pub fn read_exact_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        const CHUNK: usize = 64 * 1024;
        let mut buf = Vec::with_capacity(len.min(CHUNK));
        let mut remaining = len;
        while remaining > 0 {
            let step = remaining.min(CHUNK);
            let start = buf.len();
            buf.resize(start + step, 0);
            self.read_exact(&mut buf[start..])?;
            remaining -= step;
        }
        Ok(buf)
    }

    /// Reads one byte, or `None` on a clean end of input.
    ///
    /// This is the single legitimate termination point of the top-level
    /// record loop; EOF after even one byte of a partial read still fails.
    pub fn try_read_u8(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.position += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(u64::from_be_bytes(buf))
    }

    #[inline]
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Reads bytes up to (and consuming) a NUL terminator.
    ///
    /// Used once per pass for the header's format string ("JAVA PROFILE
    /// 1.0.2" etc.). Invalid UTF-8 is replaced, not rejected; the string is
    /// advisory.
    pub fn read_null_terminated(&mut self) -> Result<String> {
        let mut bytes = Vec::with_capacity(24);
        loop {
            let b = self.read_u8()?;
            if b == 0 {
                break;
            }
            bytes.push(b);
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

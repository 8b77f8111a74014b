//! Bounds-checked big-endian reader over an in-memory archive.
//!
//! Each method reads exactly the bytes it promises or returns an error -
//! there is no partial-read ambiguity. The cursor only moves forward.

use crate::{Error, Result};

/// Sequential reader over an immutable byte buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Start reading at the beginning of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the current position and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Whether every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read a slice of `n` bytes without copying.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read exactly `N` bytes into a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read `n` bytes as a string, replacing invalid UTF-8 sequences.
    pub fn read_string(&mut self, n: usize) -> Result<String> {
        Ok(String::from_utf8_lossy(self.read_bytes(n)?).into_owned())
    }

    /// Read one byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a big-endian `i16`.
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    /// Read an unsigned 24-bit integer (object reference indices).
    #[inline]
    pub fn read_u24(&mut self) -> Result<u32> {
        let [a, b, c] = self.read_array()?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    /// Read a big-endian `i32`.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian `u32`.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian IEEE 754 double.
    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    /// Verify that the next `N` bytes match `expected`.
    ///
    /// Returns [`Error::BadMagic`] on mismatch.
    pub fn expect_magic<const N: usize>(&mut self, expected: &'static [u8; N]) -> Result<()> {
        let got = self.read_array::<N>()?;
        if &got != expected {
            return Err(Error::BadMagic {
                expected,
                found: got.to_vec(),
            });
        }
        Ok(())
    }

    /// Read a signed 32-bit element count and check that `count` elements of
    /// at least `min_size` bytes each can still fit in the buffer.
    ///
    /// The check runs before the caller allocates anything for the elements.
    pub fn read_count(&mut self, min_size: usize) -> Result<usize> {
        let offset = self.pos;
        let declared = self.read_i32()?;
        self.check_count(offset, declared as i64, min_size)
    }

    /// Validate an already-read `declared` count the same way as
    /// [`read_count`](Self::read_count).
    pub fn check_count(&self, offset: usize, declared: i64, min_size: usize) -> Result<usize> {
        let remaining = self.remaining();
        let fits = usize::try_from(declared)
            .ok()
            .and_then(|n| n.checked_mul(min_size))
            .is_some_and(|bytes| bytes <= remaining);
        if !fits {
            return Err(Error::InvalidLength {
                offset,
                declared,
                remaining,
            });
        }
        Ok(declared as usize)
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(Error::UnexpectedEof {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }
}

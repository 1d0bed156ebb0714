//! Big-endian byte cursor with forkable positions.

use crate::error::ClassfileError;

/// A recorded `[start, end)` window of a class file.
///
/// Opening a fork yields a fresh reader over the window; it never touches
/// the reader the fork was taken from, and may be opened any number of times.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fork {
    start: usize,
    end: usize,
}

impl Fork {
    pub fn new(start: usize, end: usize) -> Self {
        Fork { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn open<'a>(&self, data: &'a [u8]) -> Result<ClassReader<'a>, ClassfileError> {
        let window = data
            .get(self.start..self.end)
            .ok_or(ClassfileError::UnexpectedEof { offset: self.end })?;
        Ok(ClassReader::with_base(window, self.start))
    }
}

#[derive(Clone)]
pub struct ClassReader<'a> {
    data: &'a [u8],
    pos: usize,
    /// Offset of `data` within the whole file, for error reporting.
    base: usize,
}

impl<'a> ClassReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_base(data, 0)
    }

    fn with_base(data: &'a [u8], base: usize) -> Self {
        ClassReader { data, pos: 0, base }
    }

    /// Absolute offset of the cursor in the class file.
    #[inline]
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// A fork from the current position to the end of this reader's window.
    pub fn fork(&self) -> Fork {
        Fork::new(self.position(), self.base + self.data.len())
    }

    fn eof(&self, len: usize) -> ClassfileError {
        ClassfileError::UnexpectedEof {
            offset: self.position() + len,
        }
    }

    pub fn read_u1(&mut self) -> Result<u8, ClassfileError> {
        let value = *self.data.get(self.pos).ok_or_else(|| self.eof(1))?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u2(&mut self) -> Result<u16, ClassfileError> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u4(&mut self) -> Result<u32, ClassfileError> {
        let bytes = self.read_slice(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u8(&mut self) -> Result<u64, ClassfileError> {
        let high = self.read_u4()? as u64;
        let low = self.read_u4()? as u64;
        Ok((high << 32) | low)
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ClassfileError> {
        if self.remaining() < len {
            return Err(self.eof(len));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), ClassfileError> {
        self.read_slice(len).map(|_| ())
    }
}

#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod tests;

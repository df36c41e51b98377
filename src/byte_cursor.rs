use crate::error::ErrorKind;
use crate::vlq::{decode_slice, CONTINUE, MAX_BYTES};
use log::trace;
use snafu::{ensure, Snafu};

/// A big-endian reader over an in-memory buffer. A cursor can hand out an isolated sub-cursor
/// over the next `n` bytes; offsets reported by either are absolute from the start of the file.
#[derive(Clone, Debug)]
pub(crate) struct ByteCursor<'a> {
    bytes: &'a [u8],
    position: usize,
    base: u64,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum ByteError {
    #[snafu(display(
        "unexpected end reached at byte {}, wanted {} bytes but {} remain",
        offset,
        wanted,
        remaining
    ))]
    End {
        offset: u64,
        wanted: usize,
        remaining: usize,
    },

    #[snafu(display("vlq starting at byte {} is longer than {} bytes", offset, MAX_BYTES))]
    VlqTooLong { offset: u64 },

    #[snafu(display("vlq starting at byte {} is cut off by the end of the data", offset))]
    VlqIncomplete { offset: u64 },
}

impl ByteError {
    pub(crate) fn offset(&self) -> u64 {
        match self {
            ByteError::End { offset, .. }
            | ByteError::VlqTooLong { offset }
            | ByteError::VlqIncomplete { offset } => *offset,
        }
    }

    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            ByteError::End { .. } => ErrorKind::UnexpectedEof,
            ByteError::VlqTooLong { .. } | ByteError::VlqIncomplete { .. } => {
                ErrorKind::MalformedVarLen
            }
        }
    }

    pub(crate) fn is_end(&self) -> bool {
        matches!(self, ByteError::End { .. })
    }
}

pub(crate) type ByteResult<T> = std::result::Result<T, ByteError>;

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            position: 0,
            base: 0,
        }
    }

    /// The absolute offset of the next byte, counted from the start of the file.
    pub(crate) fn offset(&self) -> u64 {
        self.base + self.position as u64
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub(crate) fn is_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Read exactly `n` bytes and advance.
    pub(crate) fn read(&mut self, n: usize) -> ByteResult<&'a [u8]> {
        let remaining = self.remaining();
        ensure!(
            n <= remaining,
            EndSnafu {
                offset: self.offset(),
                wanted: n,
                remaining,
            }
        );
        let start = self.position;
        self.position += n;
        Ok(&self.bytes[start..self.position])
    }

    /// Up to `n` bytes without advancing. Returns fewer at the end of the buffer.
    pub(crate) fn peek(&self, n: usize) -> &'a [u8] {
        let end = self.bytes.len().min(self.position.saturating_add(n));
        &self.bytes[self.position..end]
    }

    /// The next byte without advancing, or an error if there is none.
    pub(crate) fn peek_or_die(&self) -> ByteResult<u8> {
        match self.peek(1).first() {
            Some(byte) => Ok(*byte),
            None => EndSnafu {
                offset: self.offset(),
                wanted: 1usize,
                remaining: 0usize,
            }
            .fail(),
        }
    }

    pub(crate) fn read_u8(&mut self) -> ByteResult<u8> {
        Ok(self.read(1)?[0])
    }

    pub(crate) fn read_u16(&mut self) -> ByteResult<u16> {
        let b = self.read(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub(crate) fn read_u32(&mut self) -> ByteResult<u32> {
        let b = self.read(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn read_tag(&mut self) -> ByteResult<[u8; 4]> {
        let b = self.read(4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    /// Consumes the next `n` bytes and returns a cursor that can only see those bytes.
    pub(crate) fn sub_cursor(&mut self, n: usize) -> ByteResult<ByteCursor<'a>> {
        let base = self.offset();
        let bytes = self.read(n)?;
        Ok(ByteCursor {
            bytes,
            position: 0,
            base,
        })
    }

    /// Reads a variable-length quantity. Running out of bytes before the first byte is an
    /// ordinary end, running out in the middle of the quantity is a malformed quantity.
    pub(crate) fn read_vlq(&mut self) -> ByteResult<u32> {
        let start = self.offset();
        let mut len = 0usize;
        loop {
            let byte = match self.bytes.get(self.position + len) {
                Some(b) => *b,
                None if len == 0 => {
                    return EndSnafu {
                        offset: start,
                        wanted: 1usize,
                        remaining: 0usize,
                    }
                    .fail()
                }
                None => return VlqIncompleteSnafu { offset: start }.fail(),
            };
            len += 1;
            if byte & CONTINUE == 0 {
                break;
            }
            ensure!(len < MAX_BYTES, VlqTooLongSnafu { offset: start });
        }
        let bytes = self.read(len)?;
        // the sequence is terminated and at most MAX_BYTES long, so decoding cannot fail
        let value = decode_slice(bytes).map_err(|_| ByteError::VlqTooLong { offset: start })?;
        trace!("decoded vlq value {} from {} bytes at {}", value, len, start);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_and_peek() {
        let bytes = [0x00u8, 0x01, 0x02, 0x03, 0x04, 0x10, 0x20, 0x30, 0x40];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(9, cursor.remaining());
        assert_eq!(&[0x00, 0x01], cursor.peek(2));
        assert_eq!(0, cursor.offset());
        assert_eq!(0x00, cursor.peek_or_die().unwrap());
        assert_eq!(0x00, cursor.read_u8().unwrap());
        assert_eq!(0x0102, cursor.read_u16().unwrap());
        assert_eq!(0x0304_1020, cursor.read_u32().unwrap());
        assert_eq!(&[0x30, 0x40], cursor.peek(10));
        assert_eq!(2, cursor.remaining());
        let e = cursor.read(3).err().unwrap();
        assert!(e.is_end());
        assert_eq!(7, e.offset());
        // a failed read does not advance
        assert_eq!(&[0x30, 0x40], cursor.read(2).unwrap());
        assert!(cursor.is_end());
        assert!(cursor.peek(1).is_empty());
        assert!(cursor.peek_or_die().err().unwrap().is_end());
    }

    #[test]
    fn sub_cursor_is_isolated() {
        let bytes = [0xAAu8, 0x01, 0x02, 0x03, 0xBB];
        let mut cursor = ByteCursor::new(&bytes);
        cursor.read(1).unwrap();
        let mut sub = cursor.sub_cursor(3).unwrap();
        assert_eq!(1, sub.offset());
        assert_eq!(&[0x01, 0x02, 0x03], sub.read(3).unwrap());
        let e = sub.read_u8().err().unwrap();
        assert_eq!(4, e.offset());
        assert_eq!(0xBB, cursor.read_u8().unwrap());
    }

    #[test]
    fn vlq_values() {
        let bytes = [0x00u8, 0x7f, 0x81, 0x00, 0xff, 0xff, 0xff, 0x7f];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(0, cursor.read_vlq().unwrap());
        assert_eq!(0x7f, cursor.read_vlq().unwrap());
        assert_eq!(0x80, cursor.read_vlq().unwrap());
        assert_eq!(0x0fff_ffff, cursor.read_vlq().unwrap());
        assert!(cursor.read_vlq().err().unwrap().is_end());
    }

    #[test]
    fn vlq_too_long() {
        let bytes = [0x81u8, 0x80, 0x80, 0x80, 0x00];
        let mut cursor = ByteCursor::new(&bytes);
        let e = cursor.read_vlq().err().unwrap();
        assert_eq!(ErrorKind::MalformedVarLen, e.kind());
        assert_eq!(0, e.offset());
    }

    #[test]
    fn vlq_cut_off() {
        let bytes = [0x00u8, 0x81, 0x80];
        let mut cursor = ByteCursor::new(&bytes);
        cursor.read_u8().unwrap();
        let e = cursor.read_vlq().err().unwrap();
        assert_eq!(ErrorKind::MalformedVarLen, e.kind());
        assert_eq!(1, e.offset());
    }
}

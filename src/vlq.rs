//! Variable-length quantities, the 7-bits-per-byte integer encoding used for delta-times and
//! event lengths in MIDI files.

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// 0x7f, 127: The largest 7 bit number.
const MAX_7BIT: u8 = 0b0111_1111;

/// 0x80, 128: The highest bit is set, this bit indicates that more bytes follow.
pub(crate) const CONTINUE: u8 = 0b1000_0000;

/// A MIDI file variable-length quantity may not be longer than 4 bytes.
pub const MAX_BYTES: usize = 4;

/// The largest value that fits in [`MAX_BYTES`] bytes (28 bits).
pub const MAX_VALUE: u32 = 0x0fff_ffff;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VlqError {
    /// The last byte still had its continue bit set.
    IncompleteNumber,
    /// The value does not fit in [`MAX_BYTES`] bytes.
    Overflow,
}

impl Display for VlqError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

impl Error for VlqError {}

/// Encodes `value` in its shortest form. Values above [`MAX_VALUE`] cannot appear in a MIDI file
/// and are rejected.
pub fn encode(mut value: u32) -> std::result::Result<Vec<u8>, VlqError> {
    if value > MAX_VALUE {
        return Err(VlqError::Overflow);
    }
    if value == 0 {
        return Ok(vec![0]);
    }

    let mut result = Vec::with_capacity(MAX_BYTES);
    while value > 0 {
        // get the value of the right-most seven bits
        let mut v = (value & MAX_7BIT as u32) as u8;

        // every byte but the last one written (the first one pushed) gets the continue bit
        if !result.is_empty() {
            v |= CONTINUE;
        }

        result.push(v);
        value >>= 7;
    }
    result.reverse();
    Ok(result)
}

/// Decodes one quantity from the complete byte sequence `bytes`.
pub fn decode_slice(bytes: &[u8]) -> std::result::Result<u32, VlqError> {
    if bytes.is_empty() {
        return Err(VlqError::IncompleteNumber);
    }
    if bytes.len() > MAX_BYTES {
        return Err(VlqError::Overflow);
    }
    let mut result: u32 = 0;
    for (i, b) in bytes.iter().enumerate() {
        result = (result << 7) | (b & MAX_7BIT) as u32;

        // if this is the last byte, the continue bit should not be set
        if i == bytes.len() - 1 && b & CONTINUE != 0 {
            return Err(VlqError::IncompleteNumber);
        }
    }
    Ok(result)
}

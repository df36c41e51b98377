use crate::byte_cursor::ByteCursor;
use crate::error::LibResult;
use log::trace;
use snafu::ResultExt;
use std::fmt::{Display, Formatter};

/// `0xF0`: `F0 <length> <bytes to be transmitted after F0>`
pub(crate) const SYSEX_F0: u8 = 0xF0;

/// `0xF7`: `F7 <length> <all bytes to be transmitted>`
pub(crate) const SYSEX_F7: u8 = 0xF7;

/// A system exclusive event. The payload is the bytes after the length, kept verbatim. A sysex
/// message split into packets shows up as an `F0` event followed by `F7` continuation events.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct SysexEvent {
    kind: SysexKind,
    payload: Vec<u8>,
}

impl SysexEvent {
    pub fn new(kind: SysexKind, payload: Vec<u8>) -> Self {
        Self { kind, payload }
    }

    pub fn kind(&self) -> SysexKind {
        self.kind
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Decodes a sysex event. The cursor must be positioned on the `F0` or `F7` byte.
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>) -> LibResult<Self> {
        let offset = cursor.offset();
        let kind = match cursor.read_u8().context(io!())? {
            SYSEX_F7 => SysexKind::F7,
            _ => SysexKind::F0,
        };
        let length = cursor.read_vlq().context(io!())?;
        let payload = cursor.read(length as usize).context(io!())?.to_vec();
        trace!("{:?} sysex of {} bytes at byte {}", kind, length, offset);
        Ok(Self { kind, payload })
    }
}

impl Display for SysexEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "sysex {:?}: {:?}", self.kind, self.payload)
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash, Default)]
pub enum SysexKind {
    #[default]
    F0 = SYSEX_F0,
    F7 = SYSEX_F7,
}

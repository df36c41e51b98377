use crate::core::Channel;
use std::fmt::{Display, Formatter};

/// The channel voice message types from Table I "Summary of Status Bytes" of the MIDI
/// specification. The discriminant is the high nibble of the status byte.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash, Default)]
pub enum ChannelEventKind {
    /// `0x8`: a `Note Off` message.
    #[default]
    NoteOff = 0x8,

    /// `0x9`: a `Note On (a velocity of 0 = Note Off)` message.
    NoteOn = 0x9,

    /// `0xA`: a `Polyphonic key pressure/Aftertouch` message.
    PolyAftertouch = 0xA,

    /// `0xB`: a `Control change` message or a `Channel Mode` message. Channel Mode messages are
    /// sent under the same Status Byte as the Control Change messages (BnH). They are
    /// differentiated by the first data byte which will have a value from 121 to 127 for Channel
    /// Mode messages.
    Controller = 0xB,

    /// `0xC`: a `Program change` message.
    ProgramChange = 0xC,

    /// `0xD`: a `Channel pressure/After touch` message.
    ChannelAftertouch = 0xD,

    /// `0xE`: a `Pitch bend change` message.
    PitchBend = 0xE,
}

impl ChannelEventKind {
    /// Maps the high nibble of a status byte. `0xF` (system messages) and values below `0x8`
    /// (data bytes) are not channel messages.
    pub(crate) fn from_nibble(value: u8) -> Option<Self> {
        match value {
            0x8 => Some(ChannelEventKind::NoteOff),
            0x9 => Some(ChannelEventKind::NoteOn),
            0xA => Some(ChannelEventKind::PolyAftertouch),
            0xB => Some(ChannelEventKind::Controller),
            0xC => Some(ChannelEventKind::ProgramChange),
            0xD => Some(ChannelEventKind::ChannelAftertouch),
            0xE => Some(ChannelEventKind::PitchBend),
            _ => None,
        }
    }

    /// The number of data bytes that follow the status byte, for fresh and running status alike.
    pub fn data_len(&self) -> usize {
        match self {
            ChannelEventKind::ProgramChange | ChannelEventKind::ChannelAftertouch => 1,
            _ => 2,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ChannelEventKind::NoteOff => "note off",
            ChannelEventKind::NoteOn => "note on",
            ChannelEventKind::PolyAftertouch => "note aftertouch",
            ChannelEventKind::Controller => "controller",
            ChannelEventKind::ProgramChange => "program change",
            ChannelEventKind::ChannelAftertouch => "channel aftertouch",
            ChannelEventKind::PitchBend => "pitch bend",
        }
    }
}

impl Display for ChannelEventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded channel status byte: message type in the left four bits, channel in the right four.
/// This is also the value carried forward as running status.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct StatusByte {
    kind: ChannelEventKind,
    channel: Channel,
}

impl StatusByte {
    pub fn new(kind: ChannelEventKind, channel: Channel) -> Self {
        Self { kind, channel }
    }

    /// Splits a raw status byte, `None` if `byte` is not a channel status byte (`0x80..=0xEF`).
    pub fn from_u8(byte: u8) -> Option<Self> {
        let kind = ChannelEventKind::from_nibble(byte >> 4)?;
        Some(Self {
            kind,
            channel: Channel::new(byte & 0b0000_1111),
        })
    }

    /// Combines the status part and channel part.
    pub fn to_u8(&self) -> u8 {
        ((self.kind as u8) << 4) | self.channel.get()
    }

    pub fn kind(&self) -> ChannelEventKind {
        self.kind
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }
}

#[test]
fn split_and_merge() {
    let status = StatusByte::from_u8(0x91).unwrap();
    assert_eq!(ChannelEventKind::NoteOn, status.kind());
    assert_eq!(1, status.channel().get());
    assert_eq!(0x91, status.to_u8());
    assert_eq!(2, status.kind().data_len());

    let status = StatusByte::from_u8(0xCF).unwrap();
    assert_eq!(ChannelEventKind::ProgramChange, status.kind());
    assert_eq!(15, status.channel().get());
    assert_eq!(1, status.kind().data_len());
}

#[test]
fn not_channel_status() {
    assert!(StatusByte::from_u8(0x7F).is_none());
    assert!(StatusByte::from_u8(0xF0).is_none());
    assert!(StatusByte::from_u8(0xFF).is_none());
}

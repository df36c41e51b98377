use crate::byte_cursor::ByteCursor;
use crate::core::{Channel, ChannelEventKind, NoteNumber, StatusByte, Velocity};
use crate::error::{self, LibResult};
use crate::settings::ReadSettings;
use log::trace;
use snafu::{ensure, OptionExt, ResultExt};
use std::fmt::{Display, Formatter};

const STATUS_BIT: u8 = 0b1000_0000;

/// A channel voice message: a note, controller, program, aftertouch or pitch bend message
/// addressed to one of the 16 channels. `data` holds one or two 7-bit values depending on the
/// `kind`, see [`ChannelEventKind::data_len`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ChannelEvent {
    kind: ChannelEventKind,
    channel: Channel,
    data: [u8; 2],
}

impl ChannelEvent {
    /// Creates a channel event. Data values are masked to 7 bits, the second value is ignored for
    /// kinds that carry a single data byte.
    pub fn new(kind: ChannelEventKind, channel: Channel, data1: u8, data2: u8) -> Self {
        let data2 = if kind.data_len() == 2 { data2 & 0x7F } else { 0 };
        Self {
            kind,
            channel,
            data: [data1 & 0x7F, data2],
        }
    }

    pub fn kind(&self) -> ChannelEventKind {
        self.kind
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// The status byte that introduces this event.
    pub fn status(&self) -> StatusByte {
        StatusByte::new(self.kind, self.channel)
    }

    /// The data bytes, one or two depending on the kind.
    pub fn data(&self) -> &[u8] {
        &self.data[..self.kind.data_len()]
    }

    /// The note number of note on, note off and polyphonic aftertouch messages.
    pub fn note(&self) -> Option<NoteNumber> {
        match self.kind {
            ChannelEventKind::NoteOn
            | ChannelEventKind::NoteOff
            | ChannelEventKind::PolyAftertouch => Some(NoteNumber::new(self.data[0])),
            _ => None,
        }
    }

    /// The velocity of note on and note off messages.
    pub fn velocity(&self) -> Option<Velocity> {
        match self.kind {
            ChannelEventKind::NoteOn | ChannelEventKind::NoteOff => {
                Some(Velocity::new(self.data[1]))
            }
            _ => None,
        }
    }

    pub fn program(&self) -> Option<u8> {
        match self.kind {
            ChannelEventKind::ProgramChange => Some(self.data[0]),
            _ => None,
        }
    }

    /// The controller number and value of a control change message.
    pub fn controller(&self) -> Option<(u8, u8)> {
        match self.kind {
            ChannelEventKind::Controller => Some((self.data[0], self.data[1])),
            _ => None,
        }
    }

    /// The 14-bit pitch bend centered on zero, i.e. in the range -8192 to 8191.
    pub fn pitch_bend(&self) -> Option<i16> {
        match self.kind {
            ChannelEventKind::PitchBend => {
                let value = (u16::from(self.data[1]) << 7) | u16::from(self.data[0]);
                Some(value as i16 - 8192)
            }
            _ => None,
        }
    }

    /// A note on with a velocity greater than zero.
    pub fn is_note_start(&self) -> bool {
        self.kind == ChannelEventKind::NoteOn && self.data[1] > 0
    }

    /// A note off, or a note on with zero velocity.
    pub fn is_note_release(&self) -> bool {
        match self.kind {
            ChannelEventKind::NoteOff => true,
            ChannelEventKind::NoteOn => self.data[1] == 0,
            _ => false,
        }
    }

    /// Decodes a channel event. If the next byte is a status byte it is consumed and becomes the
    /// new running status, otherwise `running_status` supplies the kind and channel and the byte
    /// is the first data byte. Returns the event and the running status to use next.
    pub(crate) fn decode(
        cursor: &mut ByteCursor<'_>,
        running_status: Option<StatusByte>,
        settings: ReadSettings,
    ) -> LibResult<(Self, StatusByte)> {
        let offset = cursor.offset();
        let byte = cursor.read_u8().context(io!())?;
        let (status, first) = if byte & STATUS_BIT == STATUS_BIT {
            let status = StatusByte::from_u8(byte).context(error::InvalidStatusByteSnafu {
                site: site!(),
                offset,
                byte,
            })?;
            (status, None)
        } else {
            let status = match running_status {
                Some(status) if settings.running_status => status,
                _ => {
                    return error::MissingRunningStatusSnafu {
                        site: site!(),
                        offset,
                        byte,
                    }
                    .fail()
                }
            };
            trace!("running status {:#04X} at byte {}", status.to_u8(), offset);
            (status, Some(byte))
        };

        let mut data = [0u8; 2];
        for (i, slot) in data.iter_mut().enumerate().take(status.kind().data_len()) {
            *slot = match (i, first) {
                (0, Some(value)) => value,
                _ => read_data_byte(cursor)?,
            };
        }

        let event = Self {
            kind: status.kind(),
            channel: status.channel(),
            data,
        };
        trace!("channel {}: {}", event.channel, event);
        Ok((event, status))
    }
}

fn read_data_byte(cursor: &mut ByteCursor<'_>) -> LibResult<u8> {
    let offset = cursor.offset();
    let byte = cursor.read_u8().context(io!())?;
    ensure!(
        byte & STATUS_BIT == 0,
        error::InvalidDataByteSnafu {
            site: site!(),
            offset,
            byte,
        }
    );
    Ok(byte)
}

impl Display for ChannelEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.kind, self.data())
    }
}

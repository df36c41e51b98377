use crate::byte_cursor::ByteCursor;
use crate::core::{ChannelEvent, StatusByte};
use crate::error::LibResult;
use crate::file::meta_event::META_EVENT;
use crate::file::sysex::{SYSEX_F0, SYSEX_F7};
use crate::file::{MetaEvent, SysexEvent};
use crate::settings::ReadSettings;
use log::trace;
use snafu::ResultExt;
use std::fmt::{Display, Formatter};

/// <event> = <MIDI event> | <sysex event> | <meta-event>
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum Event {
    /// <MIDI event> is any MIDI channel message. Running status is used.
    Channel(ChannelEvent),
    /// <meta-event> specifies non-MIDI information useful to this format or to sequencers.
    Meta(MetaEvent),
    /// <sysex event> is used to specify a MIDI system exclusive message.
    Sysex(SysexEvent),
}

impl Event {
    pub fn as_channel(&self) -> Option<&ChannelEvent> {
        match self {
            Event::Channel(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_meta(&self) -> Option<&MetaEvent> {
        match self {
            Event::Meta(meta) => Some(meta),
            _ => None,
        }
    }

    /// Decodes one event given the running status left by the previous event of the track.
    /// Returns the event together with the running status for the next one: meta-events leave it
    /// alone, sysex events cancel it, channel events set it.
    pub(crate) fn decode(
        cursor: &mut ByteCursor<'_>,
        running_status: Option<StatusByte>,
        settings: ReadSettings,
    ) -> LibResult<(Self, Option<StatusByte>)> {
        let status_byte = cursor.peek_or_die().context(io!())?;
        match status_byte {
            META_EVENT => {
                trace!("I peeked at {:#04X}, a meta event", status_byte);
                Ok((Event::Meta(MetaEvent::decode(cursor)?), running_status))
            }
            SYSEX_F0 | SYSEX_F7 => {
                trace!("I peeked at {:#04X}, a sysex event", status_byte);
                Ok((Event::Sysex(SysexEvent::decode(cursor)?), None))
            }
            _ => {
                let (event, status) = ChannelEvent::decode(cursor, running_status, settings)?;
                Ok((Event::Channel(event), Some(status)))
            }
        }
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Channel(event) => Display::fmt(event, f),
            Event::Meta(meta) => Display::fmt(meta, f),
            Event::Sysex(sysex) => Display::fmt(sysex, f),
        }
    }
}

/// <MTrk event> = <delta-time> <event>
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct TrackEvent {
    /// <delta-time> is stored as a variable-length quantity. It represents the amount of time
    /// before the following event. If the first event in a track occurs at the very beginning of a
    /// track, or if two events occur simultaneously, a delta-time of zero is used. Delta-times are
    /// always present. Delta-time is in ticks as specified in the header chunk.
    delta_time: u32,
    event: Event,
}

impl TrackEvent {
    pub fn new(delta_time: u32, event: Event) -> Self {
        Self { delta_time, event }
    }

    pub fn delta_time(&self) -> u32 {
        self.delta_time
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Returns true if the track event is an end of track meta-event.
    pub fn is_end(&self) -> bool {
        matches!(&self.event, Event::Meta(meta) if meta.is_end_of_track())
    }

    pub(crate) fn decode(
        cursor: &mut ByteCursor<'_>,
        running_status: Option<StatusByte>,
        settings: ReadSettings,
    ) -> LibResult<(Self, Option<StatusByte>)> {
        let delta_time = cursor.read_vlq().context(io!())?;
        trace!("delta_time {}", delta_time);
        let (event, running_status) = Event::decode(cursor, running_status, settings)?;
        Ok((Self { delta_time, event }, running_status))
    }
}

use crate::byte_cursor::ByteCursor;
use crate::error::LibResult;
use log::{trace, warn};
use snafu::ResultExt;
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// `0xFF`: All meta-events begin with FF, then have an event type byte (which is always less than
/// 128), a variable-length quantity giving the length of the data, and the data itself.
pub(crate) const META_EVENT: u8 = 0xFF;

const SEQUENCE_NUMBER: u8 = 0x00;
const TEXT: u8 = 0x01;
const COPYRIGHT: u8 = 0x02;
const TRACK_NAME: u8 = 0x03;
const INSTRUMENT_NAME: u8 = 0x04;
const LYRIC: u8 = 0x05;
const MARKER: u8 = 0x06;
const CUE_POINT: u8 = 0x07;
const PROGRAM_NAME: u8 = 0x08;
const DEVICE_NAME: u8 = 0x09;
const CHANNEL_PREFIX: u8 = 0x20;
const END_OF_TRACK: u8 = 0x2F;
const SET_TEMPO: u8 = 0x51;
const SMPTE_OFFSET: u8 = 0x54;
const TIME_SIGNATURE: u8 = 0x58;
const KEY_SIGNATURE: u8 = 0x59;
const SEQUENCER_SPECIFIC: u8 = 0x7F;

/// A meta-event: `FF <type> <length> <bytes>`. The raw payload is always kept, whether or not the
/// type is understood. For the types that carry numbers (tempo, time signature, key signature,
/// SMPTE offset) the parsed values are part of the [`MetaKind`].
///
/// In general, meta-events in a track which occur at the same time may occur in any order. An
/// end-of-track event must occur as the last event in the track.
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct MetaEvent {
    kind: MetaKind,
    payload: Vec<u8>,
}

/// The meta-event types. Type bytes not listed here are preserved as [`MetaKind::Unknown`].
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash, Default)]
pub enum MetaKind {
    /// `FF 00 02 ssss`: the number of a sequence.
    SequenceNumber,
    /// `FF 01 len text`: any amount of text describing anything.
    Text,
    /// `FF 02 len text`: a copyright notice.
    Copyright,
    /// `FF 03 len text`: the name of the sequence or track.
    TrackName,
    /// `FF 04 len text`: a description of the instrumentation to be used in that track.
    InstrumentName,
    /// `FF 05 len text`: a lyric to be sung.
    Lyric,
    /// `FF 06 len text`: the name of that point in the sequence, e.g. "First Verse".
    Marker,
    /// `FF 07 len text`: a description of something happening on a film or stage at that point.
    CuePoint,
    /// `FF 08 len text`: the name of the program (patch) used to play the track.
    ProgramName,
    /// `FF 09 len text`: the name of the device the track is intended for.
    DeviceName,
    /// `FF 20 01 cc`: associates a MIDI channel with the following meta and sysex events.
    ChannelPrefix,
    /// `FF 2F 00`: the exact ending point of the track.
    #[default]
    EndOfTrack,
    /// `FF 51 03 tttttt`: Set Tempo, in microseconds per MIDI quarter-note.
    SetTempo(MicrosecondsPerQuarter),
    /// `FF 54 05 hr mn se fr ff`: the SMPTE time at which the track chunk is supposed to start.
    SmpteOffset(SmpteOffsetValue),
    /// `FF 58 04 nn dd cc bb`: the time signature.
    TimeSignature(TimeSignatureValue),
    /// `FF 59 02 sf mi`: the key signature.
    KeySignature(KeySignatureValue),
    /// `FF 7F len data`: sequencer-specific data, starting with a manufacturer ID.
    SequencerSpecific,
    /// Any other type byte. The raw type is kept.
    Unknown(u8),
}

impl MetaEvent {
    pub fn new(kind: MetaKind, payload: Vec<u8>) -> Self {
        Self { kind, payload }
    }

    pub fn kind(&self) -> &MetaKind {
        &self.kind
    }

    /// The raw data bytes that followed the length.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The type byte as it appeared in the file.
    pub fn meta_type(&self) -> u8 {
        self.kind.meta_type()
    }

    pub fn is_end_of_track(&self) -> bool {
        matches!(self.kind, MetaKind::EndOfTrack)
    }

    /// The tempo, if this is a Set Tempo event.
    pub fn tempo(&self) -> Option<MicrosecondsPerQuarter> {
        match self.kind {
            MetaKind::SetTempo(tempo) => Some(tempo),
            _ => None,
        }
    }

    /// The text of text-like events (types 0x01 through 0x09). The file format does not say what
    /// encoding text is in, so invalid UTF-8 is replaced.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        if self.kind.is_text() {
            Some(String::from_utf8_lossy(&self.payload))
        } else {
            None
        }
    }

    /// Decodes a meta-event. The cursor must be positioned on the `0xFF` byte.
    pub(crate) fn decode(cursor: &mut ByteCursor<'_>) -> LibResult<Self> {
        let offset = cursor.offset();
        let first = cursor.read_u8().context(io!())?;
        debug_assert_eq!(META_EVENT, first);
        let meta_type = cursor.read_u8().context(io!())?;
        let length = cursor.read_vlq().context(io!())?;
        let payload = cursor.read(length as usize).context(io!())?.to_vec();
        let kind = MetaKind::classify(meta_type, &payload);
        if let MetaKind::Unknown(t) = kind {
            if MetaKind::expected_len(t).is_some() {
                warn!(
                    "meta event {:#04X} at byte {} has a {} byte payload, too short to parse",
                    t,
                    offset,
                    payload.len()
                );
            } else {
                trace!("unknown meta event type {:#04X} at byte {}", t, offset);
            }
        }
        Ok(Self { kind, payload })
    }
}

impl MetaKind {
    /// The number of payload bytes a typed meta-event needs to be parsed.
    fn expected_len(meta_type: u8) -> Option<usize> {
        match meta_type {
            SET_TEMPO => Some(3),
            SMPTE_OFFSET => Some(5),
            TIME_SIGNATURE => Some(4),
            KEY_SIGNATURE => Some(2),
            _ => None,
        }
    }

    /// Maps the type byte and payload to a kind. A payload that is too short for its type cannot
    /// be interpreted, in that case the event is kept as [`MetaKind::Unknown`].
    fn classify(meta_type: u8, payload: &[u8]) -> Self {
        if let Some(needed) = Self::expected_len(meta_type) {
            if payload.len() < needed {
                return MetaKind::Unknown(meta_type);
            }
        }
        match meta_type {
            SEQUENCE_NUMBER => MetaKind::SequenceNumber,
            TEXT => MetaKind::Text,
            COPYRIGHT => MetaKind::Copyright,
            TRACK_NAME => MetaKind::TrackName,
            INSTRUMENT_NAME => MetaKind::InstrumentName,
            LYRIC => MetaKind::Lyric,
            MARKER => MetaKind::Marker,
            CUE_POINT => MetaKind::CuePoint,
            PROGRAM_NAME => MetaKind::ProgramName,
            DEVICE_NAME => MetaKind::DeviceName,
            CHANNEL_PREFIX => MetaKind::ChannelPrefix,
            END_OF_TRACK => MetaKind::EndOfTrack,
            SET_TEMPO => MetaKind::SetTempo(MicrosecondsPerQuarter::from_be_u24([
                payload[0], payload[1], payload[2],
            ])),
            SMPTE_OFFSET => MetaKind::SmpteOffset(SmpteOffsetValue {
                hr: payload[0],
                mn: payload[1],
                se: payload[2],
                fr: payload[3],
                ff: payload[4],
            }),
            TIME_SIGNATURE => MetaKind::TimeSignature(TimeSignatureValue {
                numerator: payload[0],
                denominator_exponent: payload[1],
                clocks_per_click: payload[2],
                thirty_seconds_per_quarter: payload[3],
            }),
            KEY_SIGNATURE => MetaKind::KeySignature(KeySignatureValue::from_bytes(
                payload[0], payload[1],
            )),
            SEQUENCER_SPECIFIC => MetaKind::SequencerSpecific,
            other => MetaKind::Unknown(other),
        }
    }

    /// The type byte of this kind.
    pub fn meta_type(&self) -> u8 {
        match self {
            MetaKind::SequenceNumber => SEQUENCE_NUMBER,
            MetaKind::Text => TEXT,
            MetaKind::Copyright => COPYRIGHT,
            MetaKind::TrackName => TRACK_NAME,
            MetaKind::InstrumentName => INSTRUMENT_NAME,
            MetaKind::Lyric => LYRIC,
            MetaKind::Marker => MARKER,
            MetaKind::CuePoint => CUE_POINT,
            MetaKind::ProgramName => PROGRAM_NAME,
            MetaKind::DeviceName => DEVICE_NAME,
            MetaKind::ChannelPrefix => CHANNEL_PREFIX,
            MetaKind::EndOfTrack => END_OF_TRACK,
            MetaKind::SetTempo(_) => SET_TEMPO,
            MetaKind::SmpteOffset(_) => SMPTE_OFFSET,
            MetaKind::TimeSignature(_) => TIME_SIGNATURE,
            MetaKind::KeySignature(_) => KEY_SIGNATURE,
            MetaKind::SequencerSpecific => SEQUENCER_SPECIFIC,
            MetaKind::Unknown(t) => *t,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            MetaKind::Text
                | MetaKind::Copyright
                | MetaKind::TrackName
                | MetaKind::InstrumentName
                | MetaKind::Lyric
                | MetaKind::Marker
                | MetaKind::CuePoint
                | MetaKind::ProgramName
                | MetaKind::DeviceName
        )
    }

    fn name(&self) -> &'static str {
        match self {
            MetaKind::SequenceNumber => "sequence number",
            MetaKind::Text => "text event",
            MetaKind::Copyright => "copyright notice",
            MetaKind::TrackName => "track name",
            MetaKind::InstrumentName => "instrument name",
            MetaKind::Lyric => "lyrics",
            MetaKind::Marker => "marker",
            MetaKind::CuePoint => "cue point",
            MetaKind::ProgramName => "program name",
            MetaKind::DeviceName => "device name",
            MetaKind::ChannelPrefix => "midi channel prefix",
            MetaKind::EndOfTrack => "end of track",
            MetaKind::SetTempo(_) => "set tempo",
            MetaKind::SmpteOffset(_) => "smpte offset",
            MetaKind::TimeSignature(_) => "time signature",
            MetaKind::KeySignature(_) => "key signature",
            MetaKind::SequencerSpecific => "sequencer specific",
            MetaKind::Unknown(_) => "unknown meta",
        }
    }
}

impl Display for MetaEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = self.kind.name();
        match &self.kind {
            MetaKind::SetTempo(tempo) => write!(f, "{}: {}", name, tempo),
            MetaKind::TimeSignature(t) => write!(
                f,
                "{}: {}/2^{} {} {}",
                name,
                t.numerator,
                t.denominator_exponent,
                t.clocks_per_click,
                t.thirty_seconds_per_quarter
            ),
            MetaKind::KeySignature(k) => write!(f, "{}: {} {:?}", name, k.accidentals, k.mode),
            MetaKind::EndOfTrack => f.write_str(name),
            MetaKind::Unknown(t) => write!(f, "{} {:#04X}: {:?}", name, t, self.payload),
            kind if kind.is_text() => write!(f, "{}: {}", name, String::from_utf8_lossy(&self.payload)),
            _ => write!(f, "{}: {:?}", name, self.payload),
        }
    }
}

/// `hr mn se fr ff`, held as raw bytes. The hour byte also encodes the SMPTE frame rate in its
/// upper bits.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct SmpteOffsetValue {
    hr: u8,
    mn: u8,
    se: u8,
    fr: u8,
    ff: u8,
}

impl SmpteOffsetValue {
    pub fn hours(&self) -> u8 {
        self.hr
    }

    pub fn minutes(&self) -> u8 {
        self.mn
    }

    pub fn seconds(&self) -> u8 {
        self.se
    }

    pub fn frames(&self) -> u8 {
        self.fr
    }

    /// Fractional frames, in 100ths of a frame.
    pub fn fractional_frames(&self) -> u8 {
        self.ff
    }
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct TimeSignatureValue {
    /// The upper part of a time signature. For example, in 6/8, the `numerator` is 6.
    numerator: u8,

    /// The lower part of a time signature as a negative power of two: 2 represents a quarter-note,
    /// 3 represents an eighth-note, etc.
    denominator_exponent: u8,

    /// The number of MIDI clocks in a metronome click. There are 24 MIDI Clocks per quarter-note.
    clocks_per_click: u8,

    /// The number of notated 32nd-notes in what MIDI thinks of as a quarter-note. This should
    /// normally be 8.
    thirty_seconds_per_quarter: u8,
}

impl Default for TimeSignatureValue {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator_exponent: 2,
            clocks_per_click: 24,
            thirty_seconds_per_quarter: 8,
        }
    }
}

impl TimeSignatureValue {
    pub fn numerator(&self) -> u8 {
        self.numerator
    }

    pub fn denominator_exponent(&self) -> u8 {
        self.denominator_exponent
    }

    /// The notated denominator, e.g. 8 in 6/8. `None` if the exponent is absurdly large.
    pub fn denominator(&self) -> Option<u32> {
        1u32.checked_shl(u32::from(self.denominator_exponent))
    }

    pub fn clocks_per_click(&self) -> u8 {
        self.clocks_per_click
    }

    pub fn thirty_seconds_per_quarter(&self) -> u8 {
        self.thirty_seconds_per_quarter
    }
}

clamp!(
    /// -7 is 7 flats, +7 is 7 sharps.
    KeyAccidentals,
    i8,
    -7,
    7,
    0,
    pub
);

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash, Default)]
pub enum KeyMode {
    #[default]
    Major,
    Minor,
}

/// ```text
/// sf = -7: 7 flats
/// sf = -1: 1 flat
/// sf =  0: key of C
/// sf =  1: 1 sharp
/// sf =  7: 7 sharps
/// -----------------
/// mi = 0: major key
/// mi = 1: minor key
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct KeySignatureValue {
    accidentals: KeyAccidentals,
    mode: KeyMode,
}

impl KeySignatureValue {
    fn from_bytes(sf: u8, mi: u8) -> Self {
        let raw = sf as i8;
        let accidentals = match KeyAccidentals::checked(raw) {
            Some(accidentals) => accidentals,
            None => {
                warn!("key signature with {} accidentals, clamping", raw);
                KeyAccidentals::new(raw)
            }
        };
        let mode = match mi {
            0 => KeyMode::Major,
            1 => KeyMode::Minor,
            other => {
                warn!("key signature mode {} is neither major nor minor, using major", other);
                KeyMode::Major
            }
        };
        Self { accidentals, mode }
    }

    pub fn accidentals(&self) -> KeyAccidentals {
        self.accidentals
    }

    pub fn mode(&self) -> KeyMode {
        self.mode
    }
}

pub(crate) const DEFAULT_MICROSECONDS_PER_QUARTER: u32 = 500_000;
pub(crate) const MAX_24BIT_UINT_VALUE: u32 = 16_777_215;

// Tempo microseconds are given by a 3-byte integer, hence the weird upper-bound. Default tempo is
// 120 beats per minute, which is 500_000 microseconds per beat.
//
// standard tempo is Q=120
// that is 1/120 => 0.008333333333333 minutes per beat
// 0.008333333333333 * 60 => 0.5 seconds per beat
// 0.5 * 1000000 => 500000 microseconds per beat
clamp!(
    MicrosecondsPerQuarter,
    u32,
    1,
    MAX_24BIT_UINT_VALUE,
    DEFAULT_MICROSECONDS_PER_QUARTER,
    pub
);

impl MicrosecondsPerQuarter {
    fn from_be_u24(bytes: [u8; 3]) -> Self {
        // bytes is a big-endian u24. fit it into a big-endian u32 then parse it
        let value = u32::from_be_bytes([0u8, bytes[0], bytes[1], bytes[2]]);
        if value == 0 {
            warn!("tempo of zero microseconds per quarter, using 1");
        }
        MicrosecondsPerQuarter::new(value)
    }

    /// The length of one quarter note in seconds.
    pub fn seconds_per_quarter(&self) -> f64 {
        f64::from(self.get()) / 1_000_000.0
    }

    /// Quarter notes per minute.
    pub fn beats_per_minute(&self) -> f64 {
        60_000_000.0 / f64::from(self.get())
    }
}

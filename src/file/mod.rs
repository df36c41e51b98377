//! The `file` module is for types and concepts strictly related to MIDI *files*.
//! These are separated from types and concepts that are also used in realtime MIDI (`core`).

mod division;
mod event;
mod header;
mod meta_event;
mod sysex;
mod track;

pub use division::{Division, FrameRate, QuarterNoteDivision, SmpteRate};
pub use event::{Event, TrackEvent};
pub use header::{Format, Header};
pub use meta_event::{
    KeyAccidentals, KeyMode, KeySignatureValue, MetaEvent, MetaKind, MicrosecondsPerQuarter,
    SmpteOffsetValue, TimeSignatureValue,
};
pub use sysex::{SysexEvent, SysexKind};
pub use track::Track;

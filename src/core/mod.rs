/*!
The `core` module is for types and concepts that are *not* strictly related to MIDI *files*.
These types and concepts could be used for realtime MIDI as well.
!*/

mod message;
mod numbers;
mod status_type;

pub use message::ChannelEvent;
pub use numbers::{Channel, NoteNumber, Velocity};
pub use status_type::{ChannelEventKind, StatusByte};

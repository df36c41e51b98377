//! Converts tick positions to wall-clock seconds using the header division and the tempo changes
//! of all tracks.

mod projector;
mod tempo_map;

pub use projector::{TimeProjector, TimedEvent};
pub use tempo_map::{TempoChange, TempoMap};

use std::fmt::{Display, Formatter};

/// Irregularities that were tolerated while decoding. Decoding continues past all of these, they
/// are collected on [`crate::Midi`] so that callers can decide whether they care.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum Warning {
    /// The header uses an SMPTE frame rate other than -24, -25, -29 or -30.
    UnrecognizedDivision { frames_per_second: i8 },
    /// Bytes were left in a track chunk after its End of Track event. They are skipped.
    TrailingBytes {
        track: usize,
        offset: u64,
        count: usize,
    },
    /// A track chunk ended without an End of Track event.
    MissingEndOfTrack { track: usize },
    /// A chunk that is neither `MThd` nor `MTrk`. It is skipped.
    UnknownChunk { tag: [u8; 4], offset: u64 },
    /// A second `MThd` chunk. The first one is used.
    DuplicateHeader { offset: u64 },
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnrecognizedDivision { frames_per_second } => {
                write!(f, "unrecognized SMPTE frame rate {}", frames_per_second)
            }
            Warning::TrailingBytes {
                track,
                offset,
                count,
            } => write!(
                f,
                "track {} has {} bytes after end of track at byte {}",
                track, count, offset
            ),
            Warning::MissingEndOfTrack { track } => {
                write!(f, "track {} has no end of track event", track)
            }
            Warning::UnknownChunk { tag, offset } => write!(
                f,
                "skipped unknown chunk '{}' at byte {}",
                String::from_utf8_lossy(tag),
                offset
            ),
            Warning::DuplicateHeader { offset } => {
                write!(f, "ignored extra header chunk at byte {}", offset)
            }
        }
    }
}

/*!
Decodes Standard MIDI Files and places their events on a wall-clock timeline.

```no_run
use midi_timeline::Midi;

let midi = Midi::load("song.mid").unwrap();
for note in midi.note_intervals() {
    println!(
        "{} {} {:.3}..{:.3}",
        note.channel(),
        note.pitch(),
        note.start_seconds(),
        note.end_seconds()
    );
}
```
!*/

#[macro_use]
mod error;
#[macro_use]
mod macros;

mod byte_cursor;
pub mod core;
pub mod file;
pub mod notes;
mod settings;
pub mod timing;
pub mod vlq;
mod warning;

use crate::byte_cursor::ByteCursor;
use crate::error::LibResult;
use crate::file::{Header, Track};
use crate::notes::NoteInterval;
use crate::timing::{TempoMap, TimeProjector, TimedEvent};
pub use error::{Error, ErrorKind, Result};
use log::{debug, trace, warn};
pub use settings::ReadSettings;
use snafu::{ensure, OptionExt, ResultExt};
use std::io::Read;
use std::path::Path;
pub use warning::Warning;

// https://www.music.mcgill.ca/~gary/306/week9/smf.html
// https://github.com/Shkyrockett/midi-unit-test-cases

const HEADER_TAG: &[u8; 4] = b"MThd";
const TRACK_TAG: &[u8; 4] = b"MTrk";

/// A decoded MIDI file. It is built once and never changes, the timing views are computed from it
/// on demand.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Midi {
    header: Header,
    tracks: Vec<Track>,
    warnings: Vec<Warning>,
}

impl Midi {
    /// Decodes a complete MIDI file held in memory.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::decode_with(bytes, ReadSettings::default())
    }

    pub fn decode_with(bytes: &[u8], settings: ReadSettings) -> Result<Self> {
        Ok(Self::decode_inner(bytes, settings)?)
    }

    /// Reads `r` to the end, then decodes.
    pub fn read<R: Read>(mut r: R) -> Result<Self> {
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes)
            .context(error::ReadSourceSnafu { site: site!() })?;
        Self::decode(&bytes)
    }

    /// Reads the file at `path` and decodes it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading '{}'", path.display());
        let bytes = std::fs::read(path).context(error::FileOpenSnafu {
            site: site!(),
            path,
        })?;
        Self::decode(&bytes)
    }

    fn decode_inner(bytes: &[u8], settings: ReadSettings) -> LibResult<Self> {
        let mut cursor = ByteCursor::new(bytes);
        let mut warnings = Vec::new();
        let mut header: Option<Header> = None;
        let mut tracks = Vec::new();
        while !cursor.is_end() {
            let offset = cursor.offset();
            let tag = cursor.read_tag().context(io!())?;
            trace!(
                "chunk '{}' at byte {}",
                String::from_utf8_lossy(&tag),
                offset
            );
            if &tag == HEADER_TAG {
                if header.is_some() {
                    skip_chunk(&mut cursor)?;
                    warn!("ignoring a second header chunk at byte {}", offset);
                    warnings.push(Warning::DuplicateHeader { offset });
                } else {
                    header = Some(Header::decode(&mut cursor, &mut warnings)?);
                }
            } else if &tag == TRACK_TAG {
                let length = cursor.read_u32().context(io!())?;
                let mut chunk = cursor.sub_cursor(length as usize).context(io!())?;
                let track = Track::decode(&mut chunk, tracks.len(), settings, &mut warnings)?;
                tracks.push(track);
            } else {
                let length = skip_chunk(&mut cursor)?;
                warn!(
                    "skipping unknown chunk '{}' of {} bytes at byte {}",
                    String::from_utf8_lossy(&tag),
                    length,
                    offset
                );
                warnings.push(Warning::UnknownChunk { tag, offset });
            }
        }

        let header = header.context(error::MissingHeaderSnafu { site: site!() })?;
        ensure!(
            usize::from(header.track_count()) == tracks.len(),
            error::TrackCountMismatchSnafu {
                site: site!(),
                declared: header.track_count(),
                found: tracks.len(),
            }
        );
        debug!(
            "decoded {} tracks with {} warnings",
            tracks.len(),
            warnings.len()
        );
        Ok(Self {
            header,
            tracks,
            warnings,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn tracks_len(&self) -> usize {
        self.tracks.len()
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Irregularities that decoding recovered from.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// The Set Tempo events of all tracks.
    pub fn tempo_map(&self) -> TempoMap {
        TempoMap::new(&self.tracks)
    }

    /// Converts ticks to seconds for this file's division and tempo map.
    pub fn projector(&self) -> TimeProjector {
        TimeProjector::new(self.header.division(), &self.tempo_map())
    }

    /// Every event of every track, ordered by time.
    pub fn timed_events(&self) -> Vec<TimedEvent> {
        self.projector().project(&self.tracks)
    }

    /// The notes of all tracks in the order they were closed, see
    /// [`notes::sort_note_intervals`] to order them by start time.
    pub fn note_intervals(&self) -> Vec<NoteInterval> {
        notes::note_intervals(&self.timed_events())
    }

    /// The time of the last event of the longest track.
    pub fn duration_seconds(&self) -> f64 {
        let projector = self.projector();
        self.tracks
            .iter()
            .map(|track| projector.end_seconds(track))
            .fold(0.0, f64::max)
    }
}

/// Reads a chunk length and skips that many bytes. Returns the length.
fn skip_chunk(cursor: &mut ByteCursor<'_>) -> LibResult<u32> {
    let length = cursor.read_u32().context(io!())?;
    cursor.read(length as usize).context(io!())?;
    Ok(length)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: [u8; 14] = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0,
    ];
    const END_TRACK: [u8; 12] = [
        b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00,
    ];

    #[test]
    fn minimal_file() {
        let bytes = [&HEADER[..], &END_TRACK[..]].concat();
        let midi = Midi::decode(&bytes).unwrap();
        assert_eq!(1, midi.tracks_len());
        assert!(midi.warnings().is_empty());
        assert_eq!(0.0, midi.duration_seconds());
    }

    #[test]
    fn unknown_chunk_is_skipped() {
        let junk = [b'J', b'U', b'N', b'K', 0, 0, 0, 2, 0xAA, 0xBB];
        let bytes = [&HEADER[..], &junk[..], &END_TRACK[..]].concat();
        let midi = Midi::decode(&bytes).unwrap();
        assert_eq!(1, midi.tracks_len());
        assert_eq!(
            &[Warning::UnknownChunk {
                tag: *b"JUNK",
                offset: 14
            }],
            midi.warnings()
        );
    }

    #[test]
    fn duplicate_header_is_skipped() {
        let bytes = [&HEADER[..], &HEADER[..], &END_TRACK[..]].concat();
        let midi = Midi::decode(&bytes).unwrap();
        assert_eq!(&[Warning::DuplicateHeader { offset: 14 }], midi.warnings());
    }

    #[test]
    fn missing_header() {
        let e = Midi::decode(&END_TRACK).err().unwrap();
        assert_eq!(ErrorKind::MissingHeader, e.kind());
        let e = Midi::decode(&[]).err().unwrap();
        assert_eq!(ErrorKind::MissingHeader, e.kind());
    }

    #[test]
    fn track_chunk_longer_than_file() {
        let mut bytes = [&HEADER[..], &END_TRACK[..]].concat();
        // declare 5 bytes, only 4 follow
        bytes[14 + 7] = 5;
        let e = Midi::decode(&bytes).err().unwrap();
        assert_eq!(ErrorKind::UnexpectedEof, e.kind());
        assert_eq!(Some(22), e.offset());
    }
}

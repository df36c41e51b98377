use crate::byte_cursor::ByteCursor;
use crate::error::{self, LibResult};
use crate::file::{MetaKind, TrackEvent};
use crate::settings::ReadSettings;
use crate::Warning;
use log::{debug, trace, warn};
use std::borrow::Cow;

/// 2.3 - Track Chunks
/// The track chunks (type MTrk) are where actual song data is stored. Each track chunk is simply a
/// stream of MIDI events (and non-MIDI events), preceded by delta-time values. The format for Track
/// Chunks (described below) is exactly the same for all three formats (0, 1, and 2: see "Header
/// Chunk" above) of MIDI Files.
///
/// Here is the syntax of an MTrk chunk (the + means "one or more": at least one MTrk event must be
/// present):
///
/// `<Track Chunk> = <chunk type><length><MTrk event>+`
#[derive(Clone, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct Track {
    events: Vec<TrackEvent>,
}

impl Track {
    pub fn new(events: Vec<TrackEvent>) -> Self {
        Self { events }
    }

    /// Returns `true` if the track has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The number of events in the track.
    pub fn events_len(&self) -> usize {
        self.events.len()
    }

    /// Iterator over the events in the track.
    pub fn events(&self) -> impl Iterator<Item = &TrackEvent> {
        self.events.iter()
    }

    pub fn event(&self, index: usize) -> Option<&TrackEvent> {
        self.events.get(index)
    }

    /// Iterator over the events paired with their absolute tick position in this track.
    pub fn ticked_events(&self) -> impl Iterator<Item = (u64, &TrackEvent)> {
        self.events.iter().scan(0u64, |tick, event| {
            *tick += u64::from(event.delta_time());
            Some((*tick, event))
        })
    }

    /// The tick of the last event, i.e. the sum of all delta times.
    pub fn end_tick(&self) -> u64 {
        self.events
            .iter()
            .map(|event| u64::from(event.delta_time()))
            .sum()
    }

    /// The text of the first track name meta-event, if any.
    pub fn name(&self) -> Option<Cow<'_, str>> {
        self.events
            .iter()
            .filter_map(|event| event.event().as_meta())
            .find(|meta| matches!(meta.kind(), MetaKind::TrackName))
            .and_then(|meta| meta.text())
    }

    /// Decodes the events of one track chunk. `cursor` must see exactly the bytes of the chunk
    /// body so that an event can never read into the next chunk.
    pub(crate) fn decode(
        cursor: &mut ByteCursor<'_>,
        index: usize,
        settings: ReadSettings,
        warnings: &mut Vec<Warning>,
    ) -> LibResult<Self> {
        let declared = cursor.remaining() as u32;
        debug!("decoding track {} with {} bytes", index, declared);
        let mut events = Vec::new();
        let mut running_status = None;
        let mut ended = false;
        while !cursor.is_end() {
            let event_offset = cursor.offset();
            let (event, next) = TrackEvent::decode(cursor, running_status, settings)
                .map_err(|e| {
                    if e.is_end() {
                        error::TrackLengthMismatchSnafu {
                            site: site!(),
                            offset: e.offset().unwrap_or(event_offset),
                            track: index,
                            declared,
                        }
                        .build()
                    } else {
                        e
                    }
                })?;
            running_status = next;
            trace!("track {} event at byte {}: {}", index, event_offset, event.event());
            let is_end = event.is_end();
            events.push(event);
            if is_end {
                ended = true;
                break;
            }
        }

        if ended && !cursor.is_end() {
            let offset = cursor.offset();
            let count = cursor.remaining();
            warn!(
                "track {} has {} bytes after end of track at byte {}, skipping them",
                index, count, offset
            );
            warnings.push(Warning::TrailingBytes {
                track: index,
                offset,
                count,
            });
        } else if !ended {
            warn!("track {} has no end of track event", index);
            warnings.push(Warning::MissingEndOfTrack { track: index });
        }

        debug!("track {} has {} events", index, events.len());
        Ok(Self { events })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn decode(bytes: &[u8]) -> (LibResult<Track>, Vec<Warning>) {
        let mut cursor = ByteCursor::new(bytes);
        let mut warnings = Vec::new();
        let result = Track::decode(&mut cursor, 0, ReadSettings::default(), &mut warnings);
        (result, warnings)
    }

    #[test]
    fn consumes_declared_length() {
        let bytes = [
            0x00, 0xFF, 0x03, 0x02, b'h', b'i', // track name
            0x00, 0x90, 60, 100, // note on
            0x60, 60, 0, // running status release
            0x00, 0xFF, 0x2F, 0x00, // end of track
        ];
        let (track, warnings) = decode(&bytes);
        let track = track.unwrap();
        assert!(warnings.is_empty());
        assert_eq!(4, track.events_len());
        assert_eq!(Some("hi".into()), track.name());
        assert_eq!(0x60, track.end_tick());
        let ticks: Vec<u64> = track.ticked_events().map(|(tick, _)| tick).collect();
        assert_eq!(vec![0, 0, 0x60, 0x60], ticks);
    }

    #[test]
    fn overrun_is_track_length_mismatch() {
        // the note on needs two data bytes but the chunk ends after one
        let bytes = [0x00, 0x90, 60];
        let (track, _) = decode(&bytes);
        let e = track.err().unwrap();
        assert_eq!(ErrorKind::TrackLengthMismatch, e.kind());
        assert_eq!(Some(3), e.offset());
    }

    #[test]
    fn trailing_bytes_after_end_of_track() {
        let bytes = [0x00, 0xFF, 0x2F, 0x00, 0x00, 0x00];
        let (track, warnings) = decode(&bytes);
        assert_eq!(1, track.unwrap().events_len());
        assert_eq!(
            vec![Warning::TrailingBytes {
                track: 0,
                offset: 4,
                count: 2
            }],
            warnings
        );
    }

    #[test]
    fn missing_end_of_track() {
        let bytes = [0x00, 0x90, 60, 100];
        let (track, warnings) = decode(&bytes);
        assert_eq!(1, track.unwrap().events_len());
        assert_eq!(vec![Warning::MissingEndOfTrack { track: 0 }], warnings);
    }

    #[test]
    fn empty_chunk() {
        let (track, warnings) = decode(&[]);
        assert!(track.unwrap().is_empty());
        assert_eq!(vec![Warning::MissingEndOfTrack { track: 0 }], warnings);
    }
}

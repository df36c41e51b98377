//! Pairs note starts with their releases.

use crate::core::{Channel, ChannelEvent, NoteNumber, Velocity};
use crate::file::Event;
use crate::timing::TimedEvent;
use log::warn;
use std::collections::HashMap;

/// A sounding note, from its note on to its release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteInterval {
    channel: Channel,
    pitch: NoteNumber,
    velocity: Velocity,
    start_seconds: f64,
    end_seconds: f64,
}

impl NoteInterval {
    pub fn new(
        channel: Channel,
        pitch: NoteNumber,
        velocity: Velocity,
        start_seconds: f64,
        end_seconds: f64,
    ) -> Self {
        Self {
            channel,
            pitch,
            velocity,
            start_seconds,
            end_seconds,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn pitch(&self) -> NoteNumber {
        self.pitch
    }

    /// The velocity of the note on.
    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn start_seconds(&self) -> f64 {
        self.start_seconds
    }

    pub fn end_seconds(&self) -> f64 {
        self.end_seconds
    }

    pub fn duration_seconds(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}

#[derive(Clone, Copy, Debug)]
struct OpenNote {
    velocity: Velocity,
    start_seconds: f64,
}

/// Builds [`NoteInterval`]s from time-ordered events. Notes are keyed by channel and pitch, so the
/// same pitch on two channels forms two independent notes.
#[derive(Clone, Debug, Default)]
pub struct NoteIntervalBuilder {
    open: HashMap<(Channel, NoteNumber), OpenNote>,
    intervals: Vec<NoteInterval>,
    last_seconds: f64,
}

impl NoteIntervalBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next event. Events must arrive in time order.
    pub fn push(&mut self, timed: &TimedEvent) {
        let seconds = timed.seconds();
        self.last_seconds = seconds;
        if let Event::Channel(event) = timed.event() {
            if event.is_note_start() {
                self.start(event, seconds);
            } else if event.is_note_release() {
                self.release(event, seconds);
            }
        }
    }

    /// Closes the notes that are still sounding at the time of the last event and returns all
    /// intervals. Intervals closed by a release come first, in the order they were closed.
    pub fn finish(mut self) -> Vec<NoteInterval> {
        let end_seconds = self.last_seconds;
        let mut stuck: Vec<NoteInterval> = self
            .open
            .drain()
            .map(|((channel, pitch), open)| NoteInterval {
                channel,
                pitch,
                velocity: open.velocity,
                start_seconds: open.start_seconds,
                end_seconds,
            })
            .collect();
        if !stuck.is_empty() {
            warn!(
                "{} notes were never released, closing them at {}s",
                stuck.len(),
                end_seconds
            );
        }
        sort_note_intervals(&mut stuck);
        self.intervals.extend(stuck);
        self.intervals
    }

    fn start(&mut self, event: &ChannelEvent, seconds: f64) {
        let (key, velocity) = match (event.note(), event.velocity()) {
            (Some(pitch), Some(velocity)) => ((event.channel(), pitch), velocity),
            _ => return,
        };
        let open = OpenNote {
            velocity,
            start_seconds: seconds,
        };
        if let Some(previous) = self.open.insert(key, open) {
            warn!(
                "note {} on channel {} started again at {}s without a release",
                key.1, key.0, seconds
            );
            self.close(key, previous, seconds);
        }
    }

    fn release(&mut self, event: &ChannelEvent, seconds: f64) {
        let key = match event.note() {
            Some(pitch) => (event.channel(), pitch),
            None => return,
        };
        match self.open.remove(&key) {
            Some(open) => self.close(key, open, seconds),
            None => warn!(
                "ignoring release of note {} on channel {} at {}s, it is not sounding",
                key.1,
                key.0,
                seconds
            ),
        }
    }

    fn close(&mut self, (channel, pitch): (Channel, NoteNumber), open: OpenNote, seconds: f64) {
        self.intervals.push(NoteInterval {
            channel,
            pitch,
            velocity: open.velocity,
            start_seconds: open.start_seconds,
            end_seconds: seconds,
        });
    }
}

/// Builds note intervals from events ordered by time, e.g. the output of
/// [`crate::timing::TimeProjector::project`].
pub fn note_intervals(events: &[TimedEvent]) -> Vec<NoteInterval> {
    let mut builder = NoteIntervalBuilder::new();
    for event in events {
        builder.push(event);
    }
    builder.finish()
}

/// Sorts by start time, then channel, then pitch.
pub fn sort_note_intervals(intervals: &mut [NoteInterval]) {
    intervals.sort_by(|a, b| {
        a.start_seconds
            .total_cmp(&b.start_seconds)
            .then_with(|| a.channel.cmp(&b.channel))
            .then_with(|| a.pitch.cmp(&b.pitch))
    });
}

use crate::file::{Division, Event, SmpteRate, Track, TrackEvent};
use crate::timing::TempoMap;
use log::{debug, warn};

/// An event placed on the absolute timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedEvent {
    seconds: f64,
    tick: u64,
    track: usize,
    event: Event,
}

impl TimedEvent {
    pub fn new(seconds: f64, tick: u64, track: usize, event: Event) -> Self {
        Self {
            seconds,
            tick,
            track,
            event,
        }
    }

    /// Seconds from the start of the file.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Absolute tick within the event's own track.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Index of the track the event came from.
    pub fn track(&self) -> usize {
        self.track
    }

    pub fn event(&self) -> &Event {
        &self.event
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Clock {
    /// Quarter-note division, the tempo map decides the length of a tick.
    Metrical {
        tempo_map: TempoMap,
        ticks_per_quarter: f64,
    },
    /// SMPTE division, tempo changes have no effect.
    Fixed(f64),
}

/// Converts ticks to seconds. Every track keeps its own running time: the gap before an event is
/// converted with the tempo in force at the tick where the gap starts.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeProjector {
    clock: Clock,
}

impl TimeProjector {
    pub fn new(division: &Division, tempo_map: &TempoMap) -> Self {
        let clock = match division {
            Division::QuarterNote(ppq) => {
                if ppq.get() == 0 {
                    warn!("division of zero ticks per quarter note, using 1");
                }
                Clock::Metrical {
                    tempo_map: tempo_map.clone(),
                    ticks_per_quarter: f64::from(ppq.get().max(1)),
                }
            }
            Division::Smpte(rate) => Clock::Fixed(smpte_seconds_per_tick(rate)),
        };
        debug!("time projector for {:?}", division);
        Self { clock }
    }

    /// The length in seconds of each tick of a gap that starts at `tick`.
    pub fn seconds_per_tick(&self, tick: u64) -> f64 {
        match &self.clock {
            Clock::Fixed(seconds_per_tick) => *seconds_per_tick,
            Clock::Metrical {
                tempo_map,
                ticks_per_quarter,
            } => tempo_map.tempo_at(tick).seconds_per_quarter() / ticks_per_quarter,
        }
    }

    /// The events of `track` with their absolute tick and seconds.
    pub fn track_times<'t>(
        &'t self,
        track: &'t Track,
    ) -> impl Iterator<Item = (u64, f64, &'t TrackEvent)> + 't {
        track
            .events()
            .scan((0u64, 0.0f64), move |(tick, seconds), event| {
                let delta = u64::from(event.delta_time());
                *seconds += delta as f64 * self.seconds_per_tick(*tick);
                *tick += delta;
                Some((*tick, *seconds, event))
            })
    }

    /// The time of the last event of `track`, zero for an empty track.
    pub fn end_seconds(&self, track: &Track) -> f64 {
        self.track_times(track)
            .last()
            .map(|(_, seconds, _)| seconds)
            .unwrap_or(0.0)
    }

    /// Places every event of every track on the timeline. The result is ordered by time, events
    /// at the same time are ordered by track index and then by their order in the track.
    pub fn project(&self, tracks: &[Track]) -> Vec<TimedEvent> {
        let mut timed: Vec<TimedEvent> = tracks
            .iter()
            .enumerate()
            .flat_map(|(index, track)| {
                self.track_times(track)
                    .map(move |(tick, seconds, event)| TimedEvent {
                        seconds,
                        tick,
                        track: index,
                        event: event.event().clone(),
                    })
            })
            .collect();
        timed.sort_by(|a, b| {
            a.seconds
                .total_cmp(&b.seconds)
                .then_with(|| a.track.cmp(&b.track))
        });
        debug!("projected {} events", timed.len());
        timed
    }
}

fn smpte_seconds_per_tick(rate: &SmpteRate) -> f64 {
    let ticks_per_second = rate.frame_rate().frames_per_second() * f64::from(rate.ticks_per_frame());
    if ticks_per_second > 0.0 {
        1.0 / ticks_per_second
    } else {
        warn!(
            "SMPTE division {:?} has zero ticks per second, all events are placed at zero",
            rate
        );
        0.0
    }
}

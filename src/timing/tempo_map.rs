use crate::file::{MicrosecondsPerQuarter, Track};
use log::{debug, trace};

/// A tempo that takes effect at an absolute tick.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct TempoChange {
    tick: u64,
    tempo: MicrosecondsPerQuarter,
}

impl TempoChange {
    pub fn new(tick: u64, tempo: MicrosecondsPerQuarter) -> Self {
        Self { tick, tempo }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn tempo(&self) -> MicrosecondsPerQuarter {
        self.tempo
    }
}

/// The piecewise-constant mapping from tick to tempo. Entries are sorted by tick, no two share a
/// tick, and the first entry is always at tick 0.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TempoMap {
    changes: Vec<TempoChange>,
}

impl Default for TempoMap {
    fn default() -> Self {
        Self {
            changes: vec![TempoChange::default()],
        }
    }
}

impl TempoMap {
    /// Collects the Set Tempo events of every track. Each track's delta times are accumulated on
    /// their own. When more than one tempo lands on the same tick, the one from the lowest track
    /// index (then the earliest in that track) wins.
    pub fn new(tracks: &[Track]) -> Self {
        let changes = tracks.iter().enumerate().flat_map(|(index, track)| {
            track.ticked_events().filter_map(move |(tick, event)| {
                let tempo = event.event().as_meta()?.tempo()?;
                trace!("track {} sets tempo {} at tick {}", index, tempo, tick);
                Some(TempoChange::new(tick, tempo))
            })
        });
        Self::from_changes(changes)
    }

    /// Builds a map from changes in any order, applying the same rules as [`TempoMap::new`].
    pub fn from_changes<I: IntoIterator<Item = TempoChange>>(changes: I) -> Self {
        let mut changes: Vec<TempoChange> = changes.into_iter().collect();
        // stable, so equal ticks keep their order of appearance
        changes.sort_by_key(|change| change.tick);
        changes.dedup_by_key(|change| change.tick);
        if changes.first().map(|change| change.tick) != Some(0) {
            changes.insert(0, TempoChange::default());
        }
        debug!("tempo map has {} entries", changes.len());
        Self { changes }
    }

    pub fn changes(&self) -> &[TempoChange] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Always `false`, a tempo map has at least the initial entry.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// The tempo in force at `tick`.
    pub fn tempo_at(&self, tick: u64) -> MicrosecondsPerQuarter {
        self.changes
            .get(self.index_at(tick))
            .map(|change| change.tempo)
            .unwrap_or_default()
    }

    /// The index of the last entry whose tick is `<= tick`.
    pub(crate) fn index_at(&self, tick: u64) -> usize {
        self.changes
            .partition_point(|change| change.tick <= tick)
            .saturating_sub(1)
    }
}

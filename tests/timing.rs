mod utils;

use midi_timeline::core::{Channel, NoteNumber, Velocity};
use midi_timeline::file::Event;
use midi_timeline::notes::sort_note_intervals;
use midi_timeline::Midi;
use utils::{close, enable_logging, file, header, TrackBuilder};

#[test]
fn half_second_at_one_quarter() {
    enable_logging();
    let track = TrackBuilder::new()
        .tempo(0, 500_000)
        .event(480, &[0x90, 60, 100])
        .end(0)
        .chunk();
    let midi = Midi::decode(&file(&[header(0, 1, 480), track])).unwrap();
    let timed = midi.timed_events();
    assert_eq!(3, timed.len());
    assert_eq!(480, timed[1].tick());
    assert!(close(0.5, timed[1].seconds()));
    assert!(close(0.5, midi.duration_seconds()));
}

#[test]
fn conductor_tempo_applies_to_other_tracks() {
    enable_logging();
    let conductor = TrackBuilder::new()
        .tempo(0, 1_000_000)
        .tempo(96, 250_000)
        .end(0)
        .chunk();
    let melody = TrackBuilder::new()
        .event(48, &[0x90, 60, 100])
        .event(96, &[60, 0])
        .end(48)
        .chunk();
    let midi = Midi::decode(&file(&[header(1, 2, 96), conductor, melody])).unwrap();

    let map = midi.tempo_map();
    assert_eq!(2, map.len());
    assert_eq!(250_000, map.tempo_at(96).get());

    // the gap from tick 48 to the release at tick 144 starts before the change at tick 96, so
    // all of it runs at one second per quarter
    let intervals = midi.note_intervals();
    assert_eq!(1, intervals.len());
    assert!(close(0.5, intervals[0].start_seconds()));
    assert!(close(1.5, intervals[0].end_seconds()));

    let timed = midi.timed_events();
    let release = timed.iter().find(|t| t.track() == 1 && t.tick() == 144).unwrap();
    assert!(close(1.5, release.seconds()));
    // the last gap of the melody starts at tick 144 and runs at the new tempo
    assert!(close(1.625, midi.duration_seconds()));
}

#[test]
fn events_are_ordered_by_time_then_track() {
    enable_logging();
    let first = TrackBuilder::new()
        .event(100, &[0x90, 60, 100])
        .end(0)
        .chunk();
    let second = TrackBuilder::new()
        .event(50, &[0x91, 62, 100])
        .event(50, &[0x91, 64, 100])
        .end(0)
        .chunk();
    let midi = Midi::decode(&file(&[header(1, 2, 480), first, second])).unwrap();
    let order: Vec<(usize, u64)> = midi
        .timed_events()
        .iter()
        .map(|t| (t.track(), t.tick()))
        .collect();
    assert_eq!(
        vec![(1, 50), (0, 100), (0, 100), (1, 100), (1, 100)],
        order
    );
    let timed = midi.timed_events();
    let seconds: Vec<f64> = timed.iter().map(|t| t.seconds()).collect();
    assert!(seconds.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn smpte_timing_ignores_tempo() {
    enable_logging();
    // 25 frames per second, 40 ticks per frame, i.e. millisecond ticks
    let track = TrackBuilder::new()
        .tempo(0, 1_000_000)
        .event(1000, &[0x90, 60, 100])
        .event(500, &[0x80, 60, 0])
        .end(0)
        .chunk();
    let midi = Midi::decode(&file(&[header(0, 1, 0xE728), track])).unwrap();
    let intervals = midi.note_intervals();
    assert_eq!(1, intervals.len());
    assert!(close(1.0, intervals[0].start_seconds()));
    assert!(close(1.5, intervals[0].end_seconds()));
    assert!(close(0.5, intervals[0].duration_seconds()));
}

#[test]
fn note_on_with_zero_velocity_closes_the_note() {
    enable_logging();
    // 1.2 seconds is 1152 ticks at 120 beats per minute and 480 ticks per quarter
    let track = TrackBuilder::new()
        .event(0, &[0x90, 60, 90])
        .event(1152, &[0x90, 60, 0])
        .end(0)
        .chunk();
    let midi = Midi::decode(&file(&[header(0, 1, 480), track])).unwrap();
    let intervals = midi.note_intervals();
    assert_eq!(1, intervals.len());
    let note = intervals[0];
    assert_eq!(Channel::new(0), note.channel());
    assert_eq!(NoteNumber::new(60), note.pitch());
    assert_eq!(Velocity::new(90), note.velocity());
    assert!(close(0.0, note.start_seconds()));
    assert!(close(1.2, note.end_seconds()));
}

#[test]
fn restarted_note_is_split() {
    enable_logging();
    let track = TrackBuilder::new()
        .event(0, &[0x90, 60, 80])
        .event(480, &[60, 70])
        .event(480, &[0x80, 60, 0])
        .end(0)
        .chunk();
    let midi = Midi::decode(&file(&[header(0, 1, 480), track])).unwrap();
    let intervals = midi.note_intervals();
    assert_eq!(2, intervals.len());
    assert!(close(0.0, intervals[0].start_seconds()));
    assert!(close(0.5, intervals[0].end_seconds()));
    assert_eq!(Velocity::new(80), intervals[0].velocity());
    assert!(close(0.5, intervals[1].start_seconds()));
    assert!(close(1.0, intervals[1].end_seconds()));
    assert_eq!(Velocity::new(70), intervals[1].velocity());
}

#[test]
fn unreleased_notes_end_with_the_file() {
    enable_logging();
    let melody = TrackBuilder::new()
        .event(0, &[0x92, 67, 80])
        .event(0, &[0x90, 60, 80])
        .event(480, &[0x80, 60, 0])
        .end(0)
        .chunk();
    let ending = TrackBuilder::new().end(1920).chunk();
    let midi = Midi::decode(&file(&[header(1, 2, 480), melody, ending])).unwrap();
    let mut intervals = midi.note_intervals();
    assert_eq!(2, intervals.len());
    assert_eq!(NoteNumber::new(60), intervals[0].pitch());
    assert!(close(2.0, intervals[1].end_seconds()));

    sort_note_intervals(&mut intervals);
    assert_eq!(Channel::new(0), intervals[0].channel());
    assert_eq!(Channel::new(2), intervals[1].channel());
}

#[test]
fn timed_events_keep_the_event() {
    enable_logging();
    let track = TrackBuilder::new().name(0, "lead").end(10).chunk();
    let midi = Midi::decode(&file(&[header(0, 1, 480), track])).unwrap();
    let timed = midi.timed_events();
    match timed[0].event() {
        Event::Meta(meta) => assert_eq!("lead", meta.text().unwrap()),
        other => panic!("expected meta, got {:?}", other),
    }
    assert_eq!(0, timed[1].track());
    assert_eq!(10, timed[1].tick());
}

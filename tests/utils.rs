#![allow(dead_code)]

use log::LevelFilter;
use midi_timeline::vlq;
use std::io::Write;
use std::sync::Once;

static LOGGER: Once = Once::new();

pub fn enable_logging() {
    LOGGER.call_once(logger_init)
}

fn logger_init() {
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{} {} [{}] - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Trace)
        .is_test(true)
        .init();
}

pub fn close(expected: f64, actual: f64) -> bool {
    (expected - actual).abs() < 1e-9
}

/// The bytes of an `MThd` chunk.
pub fn header(format: u16, track_count: u16, division: u16) -> Vec<u8> {
    let mut bytes = b"MThd".to_vec();
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&track_count.to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    bytes
}

/// Wraps `body` in an `MTrk` chunk whose length is the length of `body`.
pub fn chunk(tag: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut bytes = tag.to_vec();
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
    bytes
}

/// Concatenates chunks into a file.
pub fn file(chunks: &[Vec<u8>]) -> Vec<u8> {
    chunks.concat()
}

/// Builds the body of a track chunk event by event.
#[derive(Default)]
pub struct TrackBuilder {
    body: Vec<u8>,
}

impl TrackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a delta time followed by the raw event bytes.
    pub fn event(&mut self, delta_time: u32, bytes: &[u8]) -> &mut Self {
        self.body.extend(vlq::encode(delta_time).unwrap());
        self.body.extend_from_slice(bytes);
        self
    }

    pub fn meta(&mut self, delta_time: u32, meta_type: u8, payload: &[u8]) -> &mut Self {
        let mut bytes = vec![0xFF, meta_type];
        bytes.extend(vlq::encode(payload.len() as u32).unwrap());
        bytes.extend_from_slice(payload);
        self.event(delta_time, &bytes)
    }

    pub fn tempo(&mut self, delta_time: u32, microseconds: u32) -> &mut Self {
        let bytes = microseconds.to_be_bytes();
        self.meta(delta_time, 0x51, &bytes[1..])
    }

    pub fn name(&mut self, delta_time: u32, name: &str) -> &mut Self {
        self.meta(delta_time, 0x03, name.as_bytes())
    }

    pub fn end(&mut self, delta_time: u32) -> &mut Self {
        self.meta(delta_time, 0x2F, &[])
    }

    pub fn body(&self) -> Vec<u8> {
        self.body.clone()
    }

    /// The complete `MTrk` chunk.
    pub fn chunk(&self) -> Vec<u8> {
        chunk(b"MTrk", &self.body)
    }
}

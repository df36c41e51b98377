use crate::byte_cursor::ByteError;
use snafu::Snafu;
use std::path::PathBuf;

/// The public Error type for this library.
#[derive(Debug, Snafu)]
pub struct Error(LibError);

/// The public Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// The internal Result type for this library.
pub(crate) type LibResult<T> = std::result::Result<T, LibError>;

impl Error {
    /// The category of the failure, for callers that need to react to specific problems.
    pub fn kind(&self) -> ErrorKind {
        self.0.kind()
    }

    /// The absolute byte offset, from the start of the file, where decoding failed. `None` for
    /// errors that are not tied to a single position, e.g. [`ErrorKind::MissingHeader`].
    pub fn offset(&self) -> Option<u64> {
        self.0.offset()
    }
}

/// Classifies an [`Error`].
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum ErrorKind {
    /// Fewer bytes were available than the structure being read requires.
    UnexpectedEof,
    /// A variable-length quantity was longer than 4 bytes or was cut off.
    MalformedVarLen,
    /// A data byte appeared where a status byte was needed and no running status was in effect.
    MissingRunningStatus,
    /// A channel message data byte had its high bit set.
    InvalidDataByte,
    /// A status byte that cannot appear in a MIDI file (system common or real-time).
    InvalidStatusByte,
    /// The `MThd` chunk declared a length other than 6.
    InvalidHeaderLength,
    /// The format word of the header was not 0, 1 or 2.
    InvalidFormat,
    /// No `MThd` chunk was found.
    MissingHeader,
    /// The number of `MTrk` chunks differs from the header's track count.
    TrackCountMismatch,
    /// An event would have been read past the end of its track chunk.
    TrackLengthMismatch,
    /// Reading the source (file or reader) failed.
    Io,
}

/// The internal Error type for this library.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub(crate) enum LibError {
    #[snafu(display("{} Error opening file '{}': {}", site, path.display(), source))]
    FileOpen {
        site: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("{} Error while reading the source: {}", site, source))]
    ReadSource {
        site: String,
        source: std::io::Error,
    },

    #[snafu(display("{} Error while reading data: {}", site, source))]
    Read { site: String, source: ByteError },

    #[snafu(display("{} no running status for data byte {:#04X} at byte {}", site, byte, offset))]
    MissingRunningStatus { site: String, offset: u64, byte: u8 },

    #[snafu(display("{} data byte {:#04X} has its high bit set at byte {}", site, byte, offset))]
    InvalidDataByte { site: String, offset: u64, byte: u8 },

    #[snafu(display("{} status byte {:#04X} is not allowed in a file, byte {}", site, byte, offset))]
    InvalidStatusByte { site: String, offset: u64, byte: u8 },

    #[snafu(display("{} header chunk length must be 6 but was {}, byte {}", site, length, offset))]
    InvalidHeaderLength {
        site: String,
        offset: u64,
        length: u32,
    },

    #[snafu(display("{} unknown file format {}, byte {}", site, format, offset))]
    InvalidFormat {
        site: String,
        offset: u64,
        format: u16,
    },

    #[snafu(display("{} no MThd chunk found", site))]
    MissingHeader { site: String },

    #[snafu(display(
        "{} header declares {} tracks but {} MTrk chunks were found",
        site,
        declared,
        found
    ))]
    TrackCountMismatch {
        site: String,
        declared: u16,
        found: usize,
    },

    #[snafu(display(
        "{} track {} overruns its declared length of {} bytes at byte {}",
        site,
        track,
        declared,
        offset
    ))]
    TrackLengthMismatch {
        site: String,
        offset: u64,
        track: usize,
        declared: u32,
    },
}

impl LibError {
    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            LibError::FileOpen { .. } | LibError::ReadSource { .. } => ErrorKind::Io,
            LibError::Read { source, .. } => source.kind(),
            LibError::MissingRunningStatus { .. } => ErrorKind::MissingRunningStatus,
            LibError::InvalidDataByte { .. } => ErrorKind::InvalidDataByte,
            LibError::InvalidStatusByte { .. } => ErrorKind::InvalidStatusByte,
            LibError::InvalidHeaderLength { .. } => ErrorKind::InvalidHeaderLength,
            LibError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            LibError::MissingHeader { .. } => ErrorKind::MissingHeader,
            LibError::TrackCountMismatch { .. } => ErrorKind::TrackCountMismatch,
            LibError::TrackLengthMismatch { .. } => ErrorKind::TrackLengthMismatch,
        }
    }

    pub(crate) fn offset(&self) -> Option<u64> {
        match self {
            LibError::FileOpen { .. }
            | LibError::ReadSource { .. }
            | LibError::MissingHeader { .. }
            | LibError::TrackCountMismatch { .. } => None,
            LibError::Read { source, .. } => Some(source.offset()),
            LibError::MissingRunningStatus { offset, .. }
            | LibError::InvalidDataByte { offset, .. }
            | LibError::InvalidStatusByte { offset, .. }
            | LibError::InvalidHeaderLength { offset, .. }
            | LibError::InvalidFormat { offset, .. }
            | LibError::TrackLengthMismatch { offset, .. } => Some(*offset),
        }
    }

    /// Returns `true` if the cursor ran out of bytes. Inside a track chunk this means the event
    /// overran the chunk's declared length.
    pub(crate) fn is_end(&self) -> bool {
        matches!(self, LibError::Read { source, .. } if source.is_end())
    }
}

macro_rules! site {
    () => {
        format!("{}:{}", file!(), line!())
    };
}

macro_rules! io {
    () => {
        crate::error::ReadSnafu { site: site!() }
    };
}

#[test]
fn site_test() {
    let line = line!() + 1;
    let site = site!();
    assert!(site.contains("error.rs"));
    assert!(site.contains(format!("{}", line).as_str()));
}

#[test]
fn kind_and_offset_test() {
    let e: Error = InvalidDataByteSnafu {
        site: site!(),
        offset: 42u64,
        byte: 0x90u8,
    }
    .build()
    .into();
    assert_eq!(ErrorKind::InvalidDataByte, e.kind());
    assert_eq!(Some(42), e.offset());
    let message = format!("{}", e);
    assert!(message.contains("0x90"));
}

#[test]
fn missing_header_has_no_offset() {
    let e: Error = MissingHeaderSnafu { site: site!() }.build().into();
    assert_eq!(ErrorKind::MissingHeader, e.kind());
    assert!(e.offset().is_none());
}

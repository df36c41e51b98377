use crate::byte_cursor::ByteCursor;
use crate::error::{self, LibResult};
use crate::file::Division;
use crate::Warning;
use log::debug;
use snafu::{ensure, OptionExt, ResultExt};

/// The length of the `MThd` chunk body is always 6.
pub(crate) const HEADER_LENGTH: u32 = 6;

/// The `MThd` chunk: `<format> <ntrks> <division>`.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct Header {
    format: Format,
    track_count: u16,
    division: Division,
}

impl Header {
    /// Create a new `Header` object.
    pub fn new(format: Format, track_count: u16, division: Division) -> Self {
        Self {
            format,
            track_count,
            division,
        }
    }

    /// A getter for the `format` field.
    pub fn format(&self) -> Format {
        self.format
    }

    /// The number of track chunks the header announces.
    pub fn track_count(&self) -> u16 {
        self.track_count
    }

    /// A getter for the `division` field.
    pub fn division(&self) -> &Division {
        &self.division
    }

    /// Decodes the body of an `MThd` chunk. The cursor is positioned just after the chunk tag.
    pub(crate) fn decode(
        cursor: &mut ByteCursor<'_>,
        warnings: &mut Vec<Warning>,
    ) -> LibResult<Self> {
        let length_offset = cursor.offset();
        let length = cursor.read_u32().context(io!())?;
        ensure!(
            length == HEADER_LENGTH,
            error::InvalidHeaderLengthSnafu {
                site: site!(),
                offset: length_offset,
                length,
            }
        );
        let format_offset = cursor.offset();
        let format_word = cursor.read_u16().context(io!())?;
        let format = Format::from_u16(format_word).context(error::InvalidFormatSnafu {
            site: site!(),
            offset: format_offset,
            format: format_word,
        })?;
        let track_count = cursor.read_u16().context(io!())?;
        let division = Division::decode(cursor, warnings)?;
        debug!(
            "header: format {:?}, {} tracks, division {:?}",
            format, track_count, division
        );
        Ok(Self {
            format,
            track_count,
            division,
        })
    }
}

#[repr(u16)]
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash, Default)]
pub enum Format {
    /// 0 the file contains a single multi-channel track
    Single = 0,
    /// 1 the file contains one or more simultaneous tracks (or MIDI outputs) of a sequence
    #[default]
    Multi = 1,
    /// 2 the file contains one or more sequentially independent single-track patterns
    Sequential = 2,
}

impl Format {
    pub(crate) fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Format::Single),
            1 => Some(Format::Multi),
            2 => Some(Format::Sequential),
            _ => None,
        }
    }
}

use crate::byte_cursor::ByteCursor;
use crate::error::LibResult;
use crate::Warning;
use log::warn;
use snafu::ResultExt;

clamp!(
    /// The allowable values for [`Division`] when using the quarter note method. It is a `u15`
    /// and thus has the range 0 to 32,767. The value is kept as written in the file, even a zero.
    /// The default value is 480.
    QuarterNoteDivision,
    u16,
    0,
    32767,
    480,
    pub
);

/// Specifies the meaning of the delta-times. It has two formats, one for metrical time, and one for
/// time-code-based time:
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum Division {
    /// If bit 15 of <division> is a zero, the bits 14 thru 0 represent the number of delta-time
    /// "ticks" which make up a quarter-note. For instance, if <division> is 96, then a time
    /// interval of an eighth-note between two events in the file would be 48.
    QuarterNote(QuarterNoteDivision),
    /// Frame rate and resolution within the frame.
    Smpte(SmpteRate),
}

impl Default for Division {
    fn default() -> Self {
        Division::QuarterNote(QuarterNoteDivision::default())
    }
}

const DIVISION_TYPE_BIT: u16 = 0b1000_0000_0000_0000;

impl Division {
    pub(crate) fn decode(
        cursor: &mut ByteCursor<'_>,
        warnings: &mut Vec<Warning>,
    ) -> LibResult<Self> {
        let value = cursor.read_u16().context(io!())?;
        let division = Division::from_u16(value);
        if let Division::Smpte(rate) = division {
            if let FrameRate::Unrecognized(frames_per_second) = rate.frame_rate() {
                warn!(
                    "unrecognized SMPTE frame rate {} in division {:#06X}",
                    frames_per_second, value
                );
                warnings.push(Warning::UnrecognizedDivision { frames_per_second });
            }
        }
        Ok(division)
    }

    /// Interprets the raw 16-bit division word. This never fails, odd SMPTE frame rates are
    /// preserved as [`FrameRate::Unrecognized`].
    pub fn from_u16(value: u16) -> Self {
        if value & DIVISION_TYPE_BIT == DIVISION_TYPE_BIT {
            let [hi, lo] = value.to_be_bytes();
            Division::Smpte(SmpteRate {
                frame_rate: FrameRate::from_i8(hi as i8),
                ticks_per_frame: lo,
            })
        } else {
            Division::QuarterNote(QuarterNoteDivision::new(value & !DIVISION_TYPE_BIT))
        }
    }
}

/// <division> Bits 14 thru 8 contain one of the four values -24, -25, -29, or -30, corresponding to
/// the four standard SMPTE and MIDI time code formats (-29 corresponds to 30 drop frame), and
/// represents the number of frames per second. These negative numbers are stored in two's
/// complement form.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash, Default)]
pub enum FrameRate {
    /// 24 frames per second
    Fps24,
    /// 25 frames per second
    #[default]
    Fps25,
    /// 30 drop. Timing uses the header value as written, i.e. 29 frames per second.
    Fps29,
    /// 30 frames per second
    Fps30,
    /// Some writers put other values here. The raw, signed value is kept.
    Unrecognized(i8),
}

impl FrameRate {
    pub(crate) fn from_i8(value: i8) -> Self {
        match value {
            -24 => FrameRate::Fps24,
            -25 => FrameRate::Fps25,
            -29 => FrameRate::Fps29,
            -30 => FrameRate::Fps30,
            other => FrameRate::Unrecognized(other),
        }
    }

    /// The magnitude of the frame rate field, the value used to convert ticks to seconds.
    pub fn frames_per_second(&self) -> f64 {
        match self {
            FrameRate::Fps24 => 24.0,
            FrameRate::Fps25 => 25.0,
            FrameRate::Fps29 => 29.0,
            FrameRate::Fps30 => 30.0,
            FrameRate::Unrecognized(raw) => f64::from(raw.unsigned_abs()),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct SmpteRate {
    /// The number of frames per second.
    frame_rate: FrameRate,
    /// The <division> second byte (stored positive) is the resolution within a frame: typical
    /// values may be 4 (MIDI time code resolution), 8, 10, 80 (bit resolution), or 100. This system
    /// allows exact specification of time-code-based tracks, but also allows millisecond-based
    /// tracks by specifying 25 frames/sec and a resolution of 40 units per frame. If the events in
    /// a file are stored with bit resolution of thirty-frame time code, the division word would be
    /// E250 hex.
    ticks_per_frame: u8,
}

impl Default for SmpteRate {
    fn default() -> Self {
        // This is the 'millisecond-based tracks' example given by the MIDI file format.
        SmpteRate {
            frame_rate: FrameRate::Fps25,
            ticks_per_frame: 40,
        }
    }
}

impl SmpteRate {
    pub fn new(frame_rate: FrameRate, ticks_per_frame: u8) -> Self {
        Self {
            frame_rate,
            ticks_per_frame,
        }
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    pub fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }
}

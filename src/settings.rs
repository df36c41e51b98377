/// Options that change how a MIDI file is decoded.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct ReadSettings {
    /// When `true` (the default), a channel event may omit its status byte and reuse the status of
    /// the previous channel event in the same track. When `false`, a missing status byte is an
    /// error.
    pub running_status: bool,
}

impl Default for ReadSettings {
    fn default() -> Self {
        Self {
            running_status: true,
        }
    }
}

impl ReadSettings {
    /// Settings that reject running status.
    pub fn strict() -> Self {
        Self {
            running_status: false,
        }
    }
}

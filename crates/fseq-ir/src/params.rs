//! Global patch parameter enums and display helpers.

/// Number of active frames in a sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FrameFormat {
    #[default]
    F128,
    F256,
    F384,
    F512,
}

impl FrameFormat {
    /// All formats in wire-byte order.
    pub const ALL: [FrameFormat; 4] = [
        FrameFormat::F128,
        FrameFormat::F256,
        FrameFormat::F384,
        FrameFormat::F512,
    ];

    /// Parse the wire byte (0-3).
    pub const fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(FrameFormat::F128),
            1 => Some(FrameFormat::F256),
            2 => Some(FrameFormat::F384),
            3 => Some(FrameFormat::F512),
            _ => None,
        }
    }

    /// Wire byte (0-3).
    pub const fn to_byte(self) -> u8 {
        match self {
            FrameFormat::F128 => 0,
            FrameFormat::F256 => 1,
            FrameFormat::F384 => 2,
            FrameFormat::F512 => 3,
        }
    }

    /// Number of frames transmitted for this format: `(byte + 1) * 128`.
    pub const fn frame_count(self) -> usize {
        (self.to_byte() as usize + 1) * 128
    }

    /// Payload byte count carried in the dump header: `32 + 50 * frames`.
    pub const fn byte_count(self) -> usize {
        crate::COMMON_BYTES + crate::FRAME_BYTES * self.frame_count()
    }

    pub const fn name(self) -> &'static str {
        match self {
            FrameFormat::F128 => "128 Frames",
            FrameFormat::F256 => "256 Frames",
            FrameFormat::F384 => "384 Frames",
            FrameFormat::F512 => "512 Frames",
        }
    }
}

/// Sequence loop behaviour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoopMode {
    #[default]
    OneWay,
    Round,
}

impl LoopMode {
    /// Out-of-range bytes clamp to the last mode.
    pub const fn from_byte(b: u8) -> Self {
        match b {
            0 => LoopMode::OneWay,
            _ => LoopMode::Round,
        }
    }

    pub const fn to_byte(self) -> u8 {
        match self {
            LoopMode::OneWay => 0,
            LoopMode::Round => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            LoopMode::OneWay => "One Way",
            LoopMode::Round => "Round",
        }
    }
}

/// Whether the sequence follows the played note.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PitchMode {
    #[default]
    Pitch,
    NonPitch,
}

impl PitchMode {
    /// Out-of-range bytes clamp to the last mode.
    pub const fn from_byte(b: u8) -> Self {
        match b {
            0 => PitchMode::Pitch,
            _ => PitchMode::NonPitch,
        }
    }

    pub const fn to_byte(self) -> u8 {
        match self {
            PitchMode::Pitch => 0,
            PitchMode::NonPitch => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PitchMode::Pitch => "Pitch",
            PitchMode::NonPitch => "Non-Pitch",
        }
    }
}

const NOTE_NAMES: [&str; 12] = ["A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#"];

/// Display name for a note-assign value (0 = C-2).
pub fn note_name(value: u8) -> alloc::string::String {
    let v = value as i32;
    alloc::format!("{}{}", NOTE_NAMES[((v + 3) % 12) as usize], (v + 9) / 12 - 2)
}

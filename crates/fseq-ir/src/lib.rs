//! Core patch model types for the Fseq editor.
//!
//! This crate defines the in-memory representation of a frequency-sequence
//! patch: 512 frames of pitch plus eight operators' voiced/unvoiced
//! frequency and level. The wire codec produces and consumes these types,
//! and the range editor mutates them.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod frequency;
mod location;
mod params;
mod patch;
mod track;

pub use frequency::{
    clamp_frequency, format_frequency, frequency_to_int, int_to_frequency, MAX_FREQUENCY_HZ,
};
pub use location::{
    PatchLocation, BANK_NAMES, INTERNAL_BANK, INTERNAL_PATCHES, PRESET_BANK, PRESET_PATCHES,
};
pub use params::{note_name, FrameFormat, LoopMode, PitchMode};
pub use patch::{
    revise_name, Frame, Operator, PatchModel, MAX_PITCH_TUNING, MAX_SEQUENCE_DELAY, MAX_STEP,
    PITCH_TUNING_CENTER,
};
pub use track::{Fields, Track};

/// Frames held by every patch, regardless of format.
pub const FRAME_COUNT: usize = 512;
/// Operators per frame.
pub const OPERATOR_COUNT: usize = 8;
/// Largest raw frequency/pitch value (14 bits).
pub const MAX_FREQUENCY: u16 = 16383;
/// Largest level value (7 bits).
pub const MAX_LEVEL: u8 = 127;
/// Patch name length on the wire.
pub const NAME_LEN: usize = 8;
/// Bytes of common (non-frame) data in a dump payload.
pub const COMMON_BYTES: usize = 32;
/// Bytes per frame in a dump payload.
pub const FRAME_BYTES: usize = 50;

//! Patch, frame and operator types.

use alloc::boxed::Box;
use arrayvec::ArrayString;

use crate::location::PatchLocation;
use crate::params::{FrameFormat, LoopMode, PitchMode};
use crate::{FRAME_COUNT, MAX_FREQUENCY, MAX_LEVEL, NAME_LEN, OPERATOR_COUNT};

/// Highest frame index usable for loop points and the end step (0-based).
pub const MAX_STEP: u16 = 511;
/// Center (and maximum 126) of the pitch tuning range.
pub const PITCH_TUNING_CENTER: u8 = 63;
pub const MAX_PITCH_TUNING: u8 = 126;
pub const MAX_SEQUENCE_DELAY: u8 = 63;

/// One of the eight parallel formant channels in a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Operator {
    /// Formant frequency (0-16383 raw units)
    pub voiced_frequency: u16,
    /// Formant level (0-127)
    pub voiced_level: u8,
    /// Noise frequency (0-16383 raw units)
    pub unvoiced_frequency: u16,
    /// Noise level (0-127)
    pub unvoiced_level: u8,
}

impl Operator {
    pub const fn zero() -> Self {
        Self {
            voiced_frequency: 0,
            voiced_level: 0,
            unvoiced_frequency: 0,
            unvoiced_level: 0,
        }
    }
}

/// A single time slice of the sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Frame {
    /// Pitch shared by all operators (0-16383 raw units)
    pub pitch: u16,
    pub operators: [Operator; OPERATOR_COUNT],
}

impl Frame {
    pub const fn zero() -> Self {
        Self {
            pitch: 0,
            operators: [Operator::zero(); OPERATOR_COUNT],
        }
    }

    /// Get an operator by 1-based index.
    pub fn operator(&self, op: u8) -> &Operator {
        debug_assert!((1..=OPERATOR_COUNT as u8).contains(&op));
        &self.operators[op as usize - 1]
    }

    /// Get a mutable operator by 1-based index.
    pub fn operator_mut(&mut self, op: u8) -> &mut Operator {
        debug_assert!((1..=OPERATOR_COUNT as u8).contains(&op));
        &mut self.operators[op as usize - 1]
    }
}

/// A complete Fseq patch.
///
/// All 512 frames always exist regardless of `format`; only the first
/// `format.frame_count()` are transmitted. Cloning produces an independent
/// snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchModel {
    /// Patch name (up to 8 printable ASCII characters)
    pub name: ArrayString<NAME_LEN>,
    /// Where the patch lives on the device
    pub location: PatchLocation,
    pub format: FrameFormat,
    /// Loop start frame (0-511)
    pub loop_start: u16,
    /// Loop end frame (0-511)
    pub loop_end: u16,
    pub loop_mode: LoopMode,
    pub pitch_mode: PitchMode,
    /// Playback speed adjustment (0-127)
    pub speed_adjust: u8,
    /// Velocity sensitivity for tempo (0-127)
    pub velocity_sensitivity_for_tempo: u8,
    /// Note the sequence was recorded at (0-127, 0 = C-2)
    pub note_assign: u8,
    /// Pitch tuning (0-126, center 63)
    pub pitch_tuning: u8,
    /// Sequence delay (0-63)
    pub sequence_delay: u8,
    /// Last frame played (0-511)
    pub end_step: u16,
    frames: Box<[Frame; FRAME_COUNT]>,
}

impl Default for PatchModel {
    fn default() -> Self {
        let mut name = ArrayString::new();
        name.push_str("Init");
        Self {
            name,
            location: PatchLocation::default(),
            format: FrameFormat::F128,
            loop_start: 0,
            loop_end: 0,
            loop_mode: LoopMode::OneWay,
            pitch_mode: PitchMode::Pitch,
            speed_adjust: 0,
            velocity_sensitivity_for_tempo: 0,
            note_assign: 0,
            pitch_tuning: PITCH_TUNING_CENTER,
            sequence_delay: 0,
            end_step: 0,
            frames: Box::new([Frame::zero(); FRAME_COUNT]),
        }
    }
}

impl PatchModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name, sanitizing it to at most 8 printable ASCII characters.
    pub fn set_name(&mut self, name: &str) {
        self.name = revise_name(name);
    }

    /// Get a frame by 1-based index.
    pub fn frame(&self, index: usize) -> &Frame {
        debug_assert!((1..=FRAME_COUNT).contains(&index));
        &self.frames[index - 1]
    }

    /// Get a mutable frame by 1-based index.
    pub fn frame_mut(&mut self, index: usize) -> &mut Frame {
        debug_assert!((1..=FRAME_COUNT).contains(&index));
        &mut self.frames[index - 1]
    }

    /// All 512 frames, in order.
    pub fn frames(&self) -> &[Frame; FRAME_COUNT] {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut [Frame; FRAME_COUNT] {
        &mut self.frames
    }

    /// The frames transmitted for the current format.
    pub fn active_frames(&self) -> &[Frame] {
        &self.frames[..self.format.frame_count()]
    }

    /// Zero every frame.
    pub fn clear_frames(&mut self) {
        self.frames.fill(Frame::zero());
    }

    /// Clamp every field into its documented range.
    pub fn revise(&mut self) {
        self.name = revise_name(&self.name);
        self.loop_start = self.loop_start.min(MAX_STEP);
        self.loop_end = self.loop_end.min(MAX_STEP);
        self.end_step = self.end_step.min(MAX_STEP);
        self.speed_adjust = self.speed_adjust.min(MAX_LEVEL);
        self.velocity_sensitivity_for_tempo = self.velocity_sensitivity_for_tempo.min(MAX_LEVEL);
        self.note_assign = self.note_assign.min(MAX_LEVEL);
        self.pitch_tuning = self.pitch_tuning.min(MAX_PITCH_TUNING);
        self.sequence_delay = self.sequence_delay.min(MAX_SEQUENCE_DELAY);
        for frame in self.frames.iter_mut() {
            frame.pitch = frame.pitch.min(MAX_FREQUENCY);
            for op in frame.operators.iter_mut() {
                op.voiced_frequency = op.voiced_frequency.min(MAX_FREQUENCY);
                op.voiced_level = op.voiced_level.min(MAX_LEVEL);
                op.unvoiced_frequency = op.unvoiced_frequency.min(MAX_FREQUENCY);
                op.unvoiced_level = op.unvoiced_level.min(MAX_LEVEL);
            }
        }
    }
}

/// Sanitize a patch name: truncate to 8 characters, replace anything that
/// is not printable ASCII with a space, then trim.
pub fn revise_name(name: &str) -> ArrayString<NAME_LEN> {
    let mut out = ArrayString::<NAME_LEN>::new();
    for c in name.trim().chars().take(NAME_LEN) {
        out.push(if c == ' ' || c.is_ascii_graphic() { c } else { ' ' });
    }
    let trimmed = out.trim();
    let mut revised = ArrayString::new();
    revised.push_str(trimmed);
    revised
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_zeroed() {
        let model = PatchModel::default();
        assert_eq!(model.frames().len(), FRAME_COUNT);
        assert!(model.frames().iter().all(|f| *f == Frame::zero()));
        assert_eq!(model.pitch_tuning, PITCH_TUNING_CENTER);
        assert_eq!(model.active_frames().len(), 128);
    }

    #[test]
    fn clone_is_independent() {
        let mut a = PatchModel::default();
        let b = a.clone();
        a.frame_mut(5).pitch = 100;
        assert_ne!(a, b);
        assert_eq!(b.frame(5).pitch, 0);
    }

    #[test]
    fn name_is_revised() {
        assert_eq!(revise_name("  Voice\tTooLong  ").as_str(), "Voice To");
        assert_eq!(revise_name("héllo").as_str(), "h llo");
        assert_eq!(revise_name("").as_str(), "");
    }

    #[test]
    fn revise_clamps_fields() {
        let mut model = PatchModel::default();
        model.loop_end = 900;
        model.pitch_tuning = 127;
        model.frame_mut(1).pitch = u16::MAX;
        model.frame_mut(1).operator_mut(3).voiced_level = 200;
        model.revise();
        assert_eq!(model.loop_end, MAX_STEP);
        assert_eq!(model.pitch_tuning, MAX_PITCH_TUNING);
        assert_eq!(model.frame(1).pitch, MAX_FREQUENCY);
        assert_eq!(model.frame(1).operator(3).voiced_level, MAX_LEVEL);
    }
}

//! Bulk frame operations.
//!
//! Frame indices are 1-based (`1..=512`). Arguments outside that range,
//! or operator numbers outside `1..=8`, are the caller's responsibility;
//! the one documented exception is [`RangeEditor::move_frame`], which
//! ignores out-of-range destinations.

use std::sync::Arc;

use fseq_ir::{
    clamp_frequency, frequency_to_int, int_to_frequency, Fields, Frame, PatchModel, Track,
    FRAME_COUNT, MAX_FREQUENCY_HZ, MAX_LEVEL,
};

use crate::clipboard::{ClipboardStore, FrameClip};
use crate::link::{DeviceLink, NullLink};
use crate::EditError;

/// Smoothing weights, centered, summing to 16.
const SMOOTH_KERNEL: [u32; 7] = [1, 2, 3, 4, 3, 2, 1];
const SMOOTH_DIVISOR: u32 = 16;
const SMOOTH_RADIUS: isize = 3;

/// Result of one editor transaction.
#[derive(Clone, Debug, Default)]
pub struct EditOutcome {
    /// Whether the model differs from its pre-edit state
    pub changed: bool,
    /// The pre-edit model, present only when `changed`
    pub checkpoint: Option<PatchModel>,
}

impl EditOutcome {
    pub fn unchanged() -> Self {
        Self::default()
    }
}

/// Where [`RangeEditor::move_frame`] reads its source frame from.
#[derive(Clone, Copy, Debug)]
pub enum FrameSource<'a> {
    /// The model being edited
    Same,
    /// Another patch, e.g. a clipboard copy
    Other(&'a PatchModel),
}

/// Applies range operations to a patch through a device link.
pub struct RangeEditor<L: DeviceLink = NullLink> {
    clipboard: ClipboardStore,
    link: L,
}

impl RangeEditor<NullLink> {
    /// An editor with a private clipboard and no device.
    pub fn detached() -> Self {
        Self::new(ClipboardStore::new(), NullLink::new())
    }
}

impl<L: DeviceLink> RangeEditor<L> {
    pub fn new(clipboard: ClipboardStore, link: L) -> Self {
        Self { clipboard, link }
    }

    pub fn clipboard(&self) -> &ClipboardStore {
        &self.clipboard
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Suspend sending, snapshot, mutate, compare, resume, resend once.
    fn transact(
        &mut self,
        name: &str,
        model: &mut PatchModel,
        edit: impl FnOnce(&mut PatchModel),
    ) -> EditOutcome {
        self.link.set_send_enabled(false);
        let before = model.clone();
        edit(model);
        let changed = *model != before;
        self.link.set_send_enabled(true);
        self.link.send_all(model);
        log::debug!(target: "fseq::edit", "{}: changed={}", name, changed);
        EditOutcome {
            changed,
            checkpoint: changed.then_some(before),
        }
    }

    fn clip(&self) -> Result<Arc<FrameClip>, EditError> {
        self.clipboard.snapshot().ok_or(EditError::ClipboardEmpty)
    }

    /// Copy the selected parts of frame `from` of `source` into frame `to`.
    ///
    /// A destination above 512 is silently ignored; one below 1 is ignored
    /// with a warning.
    pub fn move_frame(
        &mut self,
        model: &mut PatchModel,
        source: FrameSource<'_>,
        from: usize,
        to: isize,
        track: Track,
        fields: Fields,
    ) -> EditOutcome {
        if to > FRAME_COUNT as isize {
            return EditOutcome::unchanged();
        }
        if to < 1 {
            log::warn!(target: "fseq::edit", "move to frame {} ignored", to);
            return EditOutcome::unchanged();
        }
        let src = match source {
            FrameSource::Same => *model.frame(from),
            FrameSource::Other(other) => *other.frame(from),
        };
        self.transact("move", model, |m| {
            copy_fields(&src, m.frame_mut(to as usize), track, fields);
        })
    }

    /// Zero the selected parts of frame `to`.
    pub fn clear_frame(
        &mut self,
        model: &mut PatchModel,
        to: usize,
        track: Track,
        fields: Fields,
    ) -> EditOutcome {
        self.transact("clear", model, |m| {
            copy_fields(&Frame::zero(), m.frame_mut(to), track, fields);
        })
    }

    /// Exchange two operators' voiced and unvoiced data over `[from, to]`.
    /// Pitch is per frame and stays put.
    pub fn swap_tracks(
        &mut self,
        model: &mut PatchModel,
        track1: Track,
        track2: Track,
        from: usize,
        to: usize,
    ) -> Result<EditOutcome, EditError> {
        let a = single_operator(track1)?;
        let b = single_operator(track2)?;
        Ok(self.transact("swap tracks", model, |m| {
            for frame in &mut m.frames_mut()[from - 1..to] {
                frame.operators.swap(a, b);
            }
        }))
    }

    /// Overwrite `target` (one operator or all of them) with `source`'s
    /// voiced and unvoiced data over `[from, to]`.
    pub fn copy_track_to(
        &mut self,
        model: &mut PatchModel,
        source: Track,
        target: Track,
        from: usize,
        to: usize,
    ) -> Result<EditOutcome, EditError> {
        let src = single_operator(source)?;
        Ok(self.transact("copy track", model, |m| {
            for frame in &mut m.frames_mut()[from - 1..to] {
                let op = frame.operators[src];
                for dst in target.operators() {
                    frame.operators[dst] = op;
                }
            }
        }))
    }

    /// Capture `[from, to]`, then close the gap by shifting later frames
    /// down and zeroing the vacated tail.
    pub fn cut_frames(&mut self, model: &mut PatchModel, from: usize, to: usize) -> EditOutcome {
        self.clipboard.capture(model, from, to);
        let len = to - from + 1;
        self.transact("cut", model, |m| {
            let frames = m.frames_mut();
            frames.copy_within(to..FRAME_COUNT, from - 1);
            frames[FRAME_COUNT - len..].fill(Frame::zero());
        })
    }

    /// Capture `[from, to]` without touching the model.
    pub fn copy_frames(&mut self, model: &PatchModel, from: usize, to: usize) {
        self.clipboard.capture(model, from, to);
        log::debug!(target: "fseq::edit", "copy: frames {}..={}", from, to);
    }

    /// Insert the clipboard at `at`, shifting frames at and after `at` up by
    /// its length. Frames pushed past 512 are lost.
    pub fn paste_frames(&mut self, model: &mut PatchModel, at: usize) -> Result<EditOutcome, EditError> {
        let clip = self.clip()?;
        Ok(self.transact("paste", model, |m| {
            let frames = m.frames_mut();
            let start = at - 1;
            let len = clip.len().min(FRAME_COUNT - start);
            frames.copy_within(start..FRAME_COUNT - len, start + len);
            frames[start..start + len].copy_from_slice(&clip.frames()[..len]);
        }))
    }

    /// Copy the selected parts of the clipboard over the model starting at
    /// `at`, without shifting. Destinations past 512 are dropped.
    pub fn overwrite_frames(
        &mut self,
        model: &mut PatchModel,
        track: Track,
        at: usize,
        fields: Fields,
    ) -> Result<EditOutcome, EditError> {
        let clip = self.clip()?;
        Ok(self.transact("overwrite", model, |m| {
            let dst = &mut m.frames_mut()[at - 1..];
            for (src, dst) in clip.frames().iter().zip(dst.iter_mut()) {
                copy_fields(src, dst, track, fields);
            }
        }))
    }

    /// Broadcast the selected parts of frame `source` over `[from, to]`.
    pub fn distribute_frame(
        &mut self,
        model: &mut PatchModel,
        source: usize,
        from: usize,
        to: usize,
        track: Track,
        fields: Fields,
    ) -> EditOutcome {
        let src = *model.frame(source);
        self.transact("distribute", model, |m| {
            for frame in &mut m.frames_mut()[from - 1..to] {
                copy_fields(&src, frame, track, fields);
            }
        })
    }

    /// Rescale the selected levels over `[from, to]` so the loudest
    /// becomes 127. Nothing happens when every selected level is 0.
    pub fn normalize_frames(
        &mut self,
        model: &mut PatchModel,
        track: Track,
        from: usize,
        to: usize,
        voiced: bool,
        unvoiced: bool,
    ) -> EditOutcome {
        let range = from - 1..to;
        let mut max = 0u8;
        for frame in &model.frames()[range.clone()] {
            for i in track.operators() {
                let op = &frame.operators[i];
                if voiced {
                    max = max.max(op.voiced_level);
                }
                if unvoiced {
                    max = max.max(op.unvoiced_level);
                }
            }
        }

        self.transact("normalize", model, |m| {
            if max == 0 {
                return;
            }
            let scale = |v: u8| -> u8 {
                (MAX_LEVEL as f64 * v as f64 / max as f64).round().min(MAX_LEVEL as f64) as u8
            };
            for frame in &mut m.frames_mut()[range] {
                for i in track.operators() {
                    let op = &mut frame.operators[i];
                    if voiced {
                        op.voiced_level = scale(op.voiced_level);
                    }
                    if unvoiced {
                        op.unvoiced_level = scale(op.unvoiced_level);
                    }
                }
            }
        })
    }

    /// Low-pass every parameter series across all 512 frames with the
    /// `[1 2 3 4 3 2 1] / 16` kernel, replicating the edge frames.
    /// Frequencies (pitch included) are averaged in Hz.
    pub fn smooth_frames(&mut self, model: &mut PatchModel) -> EditOutcome {
        let src: Vec<Frame> = model.frames().to_vec();
        self.transact("smooth", model, |m| {
            for (i, frame) in m.frames_mut().iter_mut().enumerate() {
                frame.pitch = smooth_frequency(&src, i, |f| f.pitch);
                for op in 0..frame.operators.len() {
                    let dst = &mut frame.operators[op];
                    dst.voiced_frequency =
                        smooth_frequency(&src, i, |f| f.operators[op].voiced_frequency);
                    dst.unvoiced_frequency =
                        smooth_frequency(&src, i, |f| f.operators[op].unvoiced_frequency);
                    dst.voiced_level = smooth_level(&src, i, |f| f.operators[op].voiced_level);
                    dst.unvoiced_level = smooth_level(&src, i, |f| f.operators[op].unvoiced_level);
                }
            }
        })
    }

    /// Set every pitch in `[from, to]` to `hz`.
    pub fn set_pitch(
        &mut self,
        model: &mut PatchModel,
        from: usize,
        to: usize,
        hz: f64,
    ) -> Result<EditOutcome, EditError> {
        if !(0.0..=MAX_FREQUENCY_HZ).contains(&hz) {
            return Err(EditError::FrequencyOutOfRange(hz));
        }
        let raw = clamp_frequency(frequency_to_int(hz));
        Ok(self.transact("set pitch", model, |m| {
            for frame in &mut m.frames_mut()[from - 1..to] {
                frame.pitch = raw;
            }
        }))
    }
}

/// 0-based operator index for a single-operator selector.
fn single_operator(track: Track) -> Result<usize, EditError> {
    match track {
        Track::Operator(_) => Ok(*track.operators().start()),
        Track::All => Err(EditError::NotAnOperator(track)),
    }
}

fn copy_fields(src: &Frame, dst: &mut Frame, track: Track, fields: Fields) {
    if fields.pitch {
        dst.pitch = src.pitch;
    }
    for i in track.operators() {
        let (s, d) = (&src.operators[i], &mut dst.operators[i]);
        if fields.voiced {
            d.voiced_frequency = s.voiced_frequency;
            d.voiced_level = s.voiced_level;
        }
        if fields.unvoiced {
            d.unvoiced_frequency = s.unvoiced_frequency;
            d.unvoiced_level = s.unvoiced_level;
        }
    }
}

/// Source frames under the kernel centered on `i`, edges replicated.
fn taps(src: &[Frame], i: usize) -> impl Iterator<Item = (u32, &Frame)> {
    let last = src.len() as isize - 1;
    SMOOTH_KERNEL.iter().enumerate().map(move |(k, &w)| {
        let j = (i as isize + k as isize - SMOOTH_RADIUS).clamp(0, last);
        (w, &src[j as usize])
    })
}

fn smooth_frequency(src: &[Frame], i: usize, get: impl Fn(&Frame) -> u16) -> u16 {
    let hz: f64 = taps(src, i)
        .map(|(w, f)| w as f64 * int_to_frequency(get(f)))
        .sum::<f64>()
        / SMOOTH_DIVISOR as f64;
    clamp_frequency(frequency_to_int(hz))
}

fn smooth_level(src: &[Frame], i: usize, get: impl Fn(&Frame) -> u8) -> u8 {
    let sum: u32 = taps(src, i).map(|(w, f)| w * get(f) as u32).sum();
    ((sum + SMOOTH_DIVISOR / 2) / SMOOTH_DIVISOR) as u8
}

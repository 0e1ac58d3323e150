//! Single-slot frame clipboard.

use std::sync::{Arc, Mutex, PoisonError};

use fseq_ir::{Frame, PatchModel};

/// A captured frame range: a full copy of the source patch plus the
/// 1-based inclusive bounds that were selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameClip {
    model: PatchModel,
    lo: usize,
    hi: usize,
}

impl FrameClip {
    pub fn bounds(&self) -> (usize, usize) {
        (self.lo, self.hi)
    }

    /// Number of captured frames.
    pub fn len(&self) -> usize {
        self.hi - self.lo + 1
    }

    /// The patch the range was captured from.
    pub fn model(&self) -> &PatchModel {
        &self.model
    }

    /// Captured frames, in order.
    pub fn frames(&self) -> &[Frame] {
        &self.model.frames()[self.lo - 1..self.hi]
    }
}

/// Shared clipboard handle.
///
/// Cloning the handle shares the slot, so several editors can cut and
/// paste between each other. A fresh `ClipboardStore::default()` is
/// private to whoever creates it.
#[derive(Clone, Debug, Default)]
pub struct ClipboardStore {
    slot: Arc<Mutex<Option<Arc<FrameClip>>>>,
}

impl ClipboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot contents with `[lo, hi]` of `model`.
    pub fn capture(&self, model: &PatchModel, lo: usize, hi: usize) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let clip = Arc::new(FrameClip { model: model.clone(), lo, hi });
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(clip);
    }

    /// The current contents, if anything was captured.
    pub fn snapshot(&self) -> Option<Arc<FrameClip>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).is_none()
    }

    pub fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether two handles share one slot.
    pub fn shares_with(&self, other: &ClipboardStore) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

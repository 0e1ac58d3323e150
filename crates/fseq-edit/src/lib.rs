//! Range editing for Fseq patches.
//!
//! [`RangeEditor`] applies bulk frame operations (move, cut/copy/paste,
//! distribute, normalize, smooth, ...) to a [`PatchModel`]. Each operation
//! runs as one transaction against a [`DeviceLink`]: live transmission is
//! suspended, the model is mutated, and a single full resend follows. The
//! returned [`EditOutcome`] says whether anything changed and carries the
//! pre-edit checkpoint for an [`UndoHistory`].

mod clipboard;
mod link;
mod range;
mod undo;

pub use clipboard::{ClipboardStore, FrameClip};
pub use link::{DeviceLink, NullLink};
pub use range::{EditOutcome, FrameSource, RangeEditor};
pub use undo::UndoHistory;

use fseq_ir::Track;

/// Error type for range edits. No edit mutates the model when it fails.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Paste or overwrite before any cut/copy
    #[error("nothing captured yet")]
    ClipboardEmpty,
    /// Pitch assignment outside 0..=23597 Hz
    #[error("frequency {0} Hz is out of range")]
    FrequencyOutOfRange(f64),
    /// A single operator was required
    #[error("track {0:?} is not a single operator")]
    NotAnOperator(Track),
}

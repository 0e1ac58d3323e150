//! Undo/redo history of whole-patch checkpoints.

use std::collections::VecDeque;

use fseq_ir::PatchModel;

use crate::range::EditOutcome;

/// Bounded undo/redo stack.
///
/// Each entry is the patch as it was before an edit. Undo swaps the
/// current patch with the newest entry and moves the replaced patch onto
/// the redo side; redo does the reverse.
pub struct UndoHistory {
    undo: VecDeque<PatchModel>,
    redo: Vec<PatchModel>,
    depth: usize,
}

impl UndoHistory {
    pub const DEFAULT_DEPTH: usize = 64;

    pub fn new() -> Self {
        Self::with_depth(Self::DEFAULT_DEPTH)
    }

    /// History keeping at most `depth` undo entries (at least one).
    pub fn with_depth(depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            depth: depth.max(1),
        }
    }

    /// Record a checkpoint taken before an edit.
    pub fn push(&mut self, before: PatchModel) {
        // A new edit invalidates anything that could be redone
        self.redo.clear();
        if self.undo.len() == self.depth {
            self.undo.pop_front();
        }
        self.undo.push_back(before);
    }

    /// Record an editor outcome. Returns whether a checkpoint was stored.
    pub fn record(&mut self, outcome: EditOutcome) -> bool {
        match outcome.checkpoint {
            Some(before) if outcome.changed => {
                self.push(before);
                true
            }
            _ => false,
        }
    }

    /// Restore the previous checkpoint into `current`.
    pub fn undo(&mut self, current: &mut PatchModel) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        self.redo.push(std::mem::replace(current, previous));
        true
    }

    /// Re-apply the most recently undone edit.
    pub fn redo(&mut self, current: &mut PatchModel) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.undo.push_back(std::mem::replace(current, next));
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

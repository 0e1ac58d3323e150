//! Headless controller for the Fseq editor.
//!
//! Owns one patch together with its range editor, undo history and
//! outbound SysEx queue, so a CLI or GUI front end can share the same
//! load/edit/save behavior.

mod syx;

use std::path::Path;

use fseq_edit::{EditOutcome, RangeEditor, UndoHistory};

// Re-export common types so callers don't need the lower crates directly.
pub use fseq_edit::{ClipboardStore, DeviceLink, EditError, FrameSource};
pub use fseq_formats::{DeviceId, DumpHeader, FormatError};
pub use fseq_ir::{Fields, FrameFormat, PatchLocation, PatchModel, Track};

pub use syx::{read_syx, write_syx, SysexOutbox};

/// Error type for controller operations.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Number outside the bank's user-facing range
    #[error("no patch {number} in bank {bank}")]
    InvalidLocation { bank: u8, number: u8 },
    /// Only the Internal bank can be written
    #[error("bank {0} is read-only")]
    ReadOnlyBank(u8),
}

/// Range editor wired to the controller's outbox.
pub type Editor = RangeEditor<SysexOutbox>;

/// Headless patch controller: owns a patch and everything that edits it.
pub struct Controller {
    model: PatchModel,
    editor: Editor,
    history: UndoHistory,
}

impl Controller {
    pub fn new() -> Self {
        Self::with_settings(DeviceId::default(), UndoHistory::DEFAULT_DEPTH, ClipboardStore::new())
    }

    /// A controller on `device`, keeping `undo_depth` checkpoints and
    /// cutting/pasting through `clipboard` (clone a store to share it).
    pub fn with_settings(device: DeviceId, undo_depth: usize, clipboard: ClipboardStore) -> Self {
        Self {
            model: PatchModel::default(),
            editor: RangeEditor::new(clipboard, SysexOutbox::new(device)),
            history: UndoHistory::with_depth(undo_depth),
        }
    }

    // --- Patch management ---

    pub fn model(&self) -> &PatchModel {
        &self.model
    }

    pub fn device(&self) -> DeviceId {
        self.editor.link().device()
    }

    pub fn set_device(&mut self, device: DeviceId) {
        self.editor.link_mut().set_device(device);
    }

    pub fn clipboard(&self) -> &ClipboardStore {
        self.editor.clipboard()
    }

    /// Replace the patch with a fresh default one.
    pub fn reset(&mut self) {
        self.replace(PatchModel::default());
    }

    /// Load a dump received from the device.
    pub fn load_sysex(&mut self, data: &[u8]) -> Result<DumpHeader, ControllerError> {
        let header = fseq_formats::read_header(data)?;
        let model = fseq_formats::load_fseq(data, false)?;
        log::info!(target: "fseq::master", "loaded \"{}\" ({})", model.name, model.format.name());
        self.replace(model);
        Ok(header)
    }

    /// Load a dump read from a file; the patch lands in the Internal bank.
    pub fn load_file(&mut self, data: &[u8]) -> Result<(), ControllerError> {
        let model = fseq_formats::load_fseq(data, true)?;
        log::info!(target: "fseq::master", "loaded \"{}\" from file", model.name);
        self.replace(model);
        Ok(())
    }

    pub fn load_path(&mut self, path: &Path) -> Result<(), ControllerError> {
        let data = read_syx(&mut std::fs::File::open(path)?)?;
        self.load_file(&data)
    }

    pub fn save_path(&self, path: &Path) -> Result<(), ControllerError> {
        let mut file = std::fs::File::create(path)?;
        write_syx(&mut file, &self.model, self.device())?;
        Ok(())
    }

    fn replace(&mut self, model: PatchModel) {
        self.model = model;
        self.history.clear();
    }

    /// Encode the patch for sending, to working memory or to its stored
    /// Internal slot.
    pub fn to_sysex(&self, to_working_memory: bool) -> Vec<u8> {
        fseq_formats::encode(&self.model, self.device(), to_working_memory, false)
    }

    /// Encode the patch as it is written to disk.
    pub fn to_file_bytes(&self) -> Vec<u8> {
        fseq_formats::encode(&self.model, self.device(), false, true)
    }

    // --- Device addressing ---

    /// Point the patch at a new bank/number.
    pub fn set_location(&mut self, location: PatchLocation) -> Result<(), ControllerError> {
        if !location.is_valid() {
            return Err(ControllerError::InvalidLocation {
                bank: location.bank,
                number: location.number,
            });
        }
        self.model.location = location;
        Ok(())
    }

    /// Dump the patch into its Internal slot.
    pub fn store(&self) -> Result<Vec<u8>, ControllerError> {
        let location = self.model.location;
        if !location.is_writable() {
            return Err(ControllerError::ReadOnlyBank(location.bank));
        }
        Ok(self.to_sysex(false))
    }

    pub fn request_dump(&self) -> [u8; 8] {
        fseq_formats::request_current_dump(self.device())
    }

    /// Select the patch's location on the device, then request it.
    pub fn queue_fetch(&mut self) {
        let device = self.device();
        let [bank, number] = fseq_formats::change_patch_messages(device, self.model.location);
        let request = fseq_formats::request_current_dump(device);
        let outbox = self.editor.link_mut();
        outbox.push(bank.to_vec());
        outbox.push(number.to_vec());
        outbox.push(request.to_vec());
    }

    /// Take all queued outbound messages.
    pub fn drain_outbox(&mut self) -> Vec<Vec<u8>> {
        self.editor.link_mut().drain()
    }

    // --- Editing ---

    /// Run one range operation and record it for undo.
    ///
    /// Returns whether the patch changed. On error nothing is modified.
    pub fn apply<F>(&mut self, op: F) -> Result<bool, ControllerError>
    where
        F: FnOnce(&mut Editor, &mut PatchModel) -> Result<EditOutcome, EditError>,
    {
        let outcome = op(&mut self.editor, &mut self.model)?;
        Ok(self.history.record(outcome))
    }

    /// Change patch-wide settings (name, format, loop points, ...) as one
    /// undoable step. Values are clamped into range afterwards.
    pub fn edit_common(&mut self, edit: impl FnOnce(&mut PatchModel)) -> bool {
        let before = self.model.clone();
        edit(&mut self.model);
        self.model.revise();
        let changed = self.model != before;
        if changed {
            self.history.push(before);
            self.editor.link_mut().send_all(&self.model);
        }
        changed
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.model);
        if undone {
            self.editor.link_mut().send_all(&self.model);
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.model);
        if redone {
            self.editor.link_mut().send_all(&self.model);
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

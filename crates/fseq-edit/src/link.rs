//! The editor's view of the connected device.

use fseq_ir::PatchModel;

/// Transmission hooks for a live device connection.
///
/// While sending is disabled, individual field writes are not transmitted.
/// Bulk edits disable sending, mutate, re-enable it, then call
/// [`send_all`](DeviceLink::send_all) once.
pub trait DeviceLink {
    fn set_send_enabled(&mut self, enabled: bool);

    fn is_send_enabled(&self) -> bool;

    /// Transmit the whole patch. Ignored while sending is disabled.
    fn send_all(&mut self, model: &PatchModel);
}

/// Link used when no device is attached. Counts resend requests.
#[derive(Clone, Copy, Debug)]
pub struct NullLink {
    enabled: bool,
    sends: usize,
}

impl NullLink {
    pub fn new() -> Self {
        Self { enabled: true, sends: 0 }
    }

    /// Full resends requested while sending was enabled.
    pub fn sends(&self) -> usize {
        self.sends
    }
}

impl Default for NullLink {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceLink for NullLink {
    fn set_send_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_send_enabled(&self) -> bool {
        self.enabled
    }

    fn send_all(&mut self, _model: &PatchModel) {
        if self.enabled {
            self.sends += 1;
        }
    }
}

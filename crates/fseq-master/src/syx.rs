//! `.syx` file I/O and the outbound SysEx queue.

use std::collections::VecDeque;
use std::io::{Read, Write};

use fseq_edit::DeviceLink;
use fseq_formats::DeviceId;
use fseq_ir::PatchModel;

/// Write a patch as a file dump (Internal-memory command, target 0).
pub fn write_syx(w: &mut impl Write, model: &PatchModel, device: DeviceId) -> std::io::Result<()> {
    w.write_all(&fseq_formats::encode(model, device, false, true))
}

pub fn read_syx(r: &mut impl Read) -> std::io::Result<Vec<u8>> {
    let mut data = Vec::new();
    r.read_to_end(&mut data)?;
    Ok(data)
}

/// Device link that queues a working-memory dump for every resend.
///
/// The host drains the queue and forwards the messages to its MIDI port.
#[derive(Debug)]
pub struct SysexOutbox {
    device: DeviceId,
    enabled: bool,
    queue: VecDeque<Vec<u8>>,
}

impl SysexOutbox {
    pub fn new(device: DeviceId) -> Self {
        Self {
            device,
            enabled: true,
            queue: VecDeque::new(),
        }
    }

    pub fn device(&self) -> DeviceId {
        self.device
    }

    pub fn set_device(&mut self, device: DeviceId) {
        self.device = device;
    }

    /// Queue an arbitrary control message.
    pub fn push(&mut self, message: Vec<u8>) {
        self.queue.push_back(message);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Take every queued message, oldest first.
    pub fn drain(&mut self) -> Vec<Vec<u8>> {
        self.queue.drain(..).collect()
    }
}

impl DeviceLink for SysexOutbox {
    fn set_send_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_send_enabled(&self) -> bool {
        self.enabled
    }

    fn send_all(&mut self, model: &PatchModel) {
        if !self.enabled {
            return;
        }
        let data = fseq_formats::encode(model, self.device, true, false);
        log::debug!(target: "fseq::master", "queued {} byte working-memory dump", data.len());
        self.queue.push_back(data);
    }
}

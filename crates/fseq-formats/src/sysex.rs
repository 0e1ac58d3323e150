//! Dump header, device identity and control messages.

use std::io::Cursor;

use binrw::{binrw, BinRead};
use fseq_ir::PatchLocation;

use crate::FormatError;

pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_END: u8 = 0xF7;
pub const MANUFACTURER_ID: u8 = 0x43;
pub const MODEL_ID: u8 = 0x5E;

/// Sub-command byte for a dump into the edit buffer.
pub const DUMP_TO_WORKING_MEMORY: u8 = 0x60;
/// Sub-command byte for a dump into an Internal memory slot.
pub const DUMP_TO_INTERNAL: u8 = 0x61;

/// Parameter-change address bytes selecting the current bank and number.
const ADDRESS_BANK: u8 = 0x16;
const ADDRESS_NUMBER: u8 = 0x17;

/// The device's MIDI ID (1-15). On the wire it is sent as `id - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeviceId(u8);

impl DeviceId {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 15;

    pub const fn new(id: u8) -> Option<Self> {
        if id >= Self::MIN && id <= Self::MAX {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Accept `id` if valid, otherwise keep `current`.
    pub fn revise(id: u8, current: DeviceId) -> DeviceId {
        Self::new(id).unwrap_or(current)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Channel nibble carried in message headers (0-14).
    pub const fn channel(self) -> u8 {
        self.0 - 1
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self(1)
    }
}

/// Bytes before the payload.
pub const HEADER_LEN: usize = 9;

/// The 9-byte header that starts every bulk dump.
#[binrw]
#[brw(big, magic = b"\xF0\x43")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DumpHeader {
    /// Device channel (ID - 1)
    pub device: u8,
    /// Model ID, 0x5E for Fseq dumps
    pub model: u8,
    /// Payload byte count, high 7 bits
    pub byte_count_hi: u8,
    /// Payload byte count, low 7 bits
    pub byte_count_lo: u8,
    /// 0x60 = working memory, 0x61 = internal memory
    pub command: u8,
    pub reserved: u8,
    /// Target patch number (0 for working memory and files)
    pub target: u8,
}

impl DumpHeader {
    pub fn new(device: DeviceId, byte_count: u16, command: u8, target: u8) -> Self {
        Self {
            device: device.channel(),
            model: MODEL_ID,
            byte_count_hi: ((byte_count >> 7) & 0x7F) as u8,
            byte_count_lo: (byte_count & 0x7F) as u8,
            command,
            reserved: 0,
            target,
        }
    }

    /// 14-bit payload byte count.
    pub fn byte_count(&self) -> u16 {
        ((self.byte_count_hi as u16 & 0x7F) << 7) | (self.byte_count_lo as u16 & 0x7F)
    }

    pub fn is_working_memory(&self) -> bool {
        self.command == DUMP_TO_WORKING_MEMORY
    }

    /// Wire bytes, magic included.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        [
            SYSEX_START,
            MANUFACTURER_ID,
            self.device,
            self.model,
            self.byte_count_hi,
            self.byte_count_lo,
            self.command,
            self.reserved,
            self.target,
        ]
    }
}

/// Read and check the dump header at the start of `data`.
pub fn read_header(data: &[u8]) -> Result<DumpHeader, FormatError> {
    let header = DumpHeader::read(&mut Cursor::new(data))?;
    if header.model != MODEL_ID {
        return Err(FormatError::InvalidHeader);
    }
    Ok(header)
}

/// Ask the device to send its current edit-buffer Fseq.
pub fn request_current_dump(device: DeviceId) -> [u8; 8] {
    [
        SYSEX_START,
        MANUFACTURER_ID,
        0x60 | device.channel(),
        MODEL_ID,
        DUMP_TO_WORKING_MEMORY,
        0x00,
        0x00,
        SYSEX_END,
    ]
}

/// Two parameter changes selecting `location`: bank first, then number.
pub fn change_patch_messages(device: DeviceId, location: PatchLocation) -> [[u8; 10]; 2] {
    [
        parameter_change(device, ADDRESS_BANK, location.bank),
        parameter_change(device, ADDRESS_NUMBER, location.number),
    ]
}

fn parameter_change(device: DeviceId, address: u8, value: u8) -> [u8; 10] {
    [
        SYSEX_START,
        MANUFACTURER_ID,
        0x10 + device.channel(),
        MODEL_ID,
        0x10,
        0x00,
        address,
        0x00,
        value & 0x7F,
        SYSEX_END,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::BinWrite;

    #[test]
    fn device_id_bounds() {
        assert_eq!(DeviceId::new(0), None);
        assert_eq!(DeviceId::new(16), None);
        assert_eq!(DeviceId::new(15).map(DeviceId::channel), Some(14));
        assert_eq!(DeviceId::revise(99, DeviceId::default()), DeviceId::default());
    }

    #[test]
    fn request_dump_bytes() {
        let id = DeviceId::new(3).unwrap();
        assert_eq!(
            request_current_dump(id),
            [0xF0, 0x43, 0x62, 0x5E, 0x60, 0x00, 0x00, 0xF7]
        );
    }

    #[test]
    fn change_patch_sets_bank_then_number() {
        let id = DeviceId::new(1).unwrap();
        let [bank, number] = change_patch_messages(id, PatchLocation::new(1, 42));
        assert_eq!(bank, [0xF0, 0x43, 0x10, 0x5E, 0x10, 0x00, 0x16, 0x00, 0x01, 0xF7]);
        assert_eq!(number, [0xF0, 0x43, 0x10, 0x5E, 0x10, 0x00, 0x17, 0x00, 42, 0xF7]);
    }

    #[test]
    fn header_write_then_read() {
        let id = DeviceId::new(2).unwrap();
        let header = DumpHeader::new(id, 6432, DUMP_TO_INTERNAL, 4);
        let mut buf = Vec::new();
        header.write(&mut Cursor::new(&mut buf)).unwrap();
        assert_eq!(buf, [0xF0, 0x43, 0x01, 0x5E, 0x32, 0x20, 0x61, 0x00, 0x04]);
        assert_eq!(header.to_bytes().as_slice(), buf.as_slice());
        assert_eq!(read_header(&buf).unwrap().byte_count(), 6432);
    }

    #[test]
    fn header_rejects_wrong_manufacturer() {
        let buf = [0xF0, 0x41, 0x00, 0x5E, 0, 0, 0x60, 0, 0];
        assert!(matches!(read_header(&buf), Err(FormatError::InvalidHeader)));
    }

    #[test]
    fn header_reports_short_input() {
        assert!(matches!(read_header(&[0xF0, 0x43, 0x00]), Err(FormatError::UnexpectedEof)));
    }
}

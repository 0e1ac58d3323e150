//! Bank/number addressing of patches on the device.

use alloc::string::String;

/// Bank names by index. Banks beyond these have no display name.
pub const BANK_NAMES: [&str; 2] = ["Internal", "Preset"];

pub const INTERNAL_BANK: u8 = 0;
pub const PRESET_BANK: u8 = 1;

/// User-facing patch count in the Internal bank.
pub const INTERNAL_PATCHES: u8 = 6;
/// User-facing patch count in the Preset bank.
pub const PRESET_PATCHES: u8 = 90;

/// Entries per bank when stepping through locations.
const BANK_SIZE: u8 = 128;
/// Bank index wraps to 0 after this many banks.
const BANK_COUNT: u8 = 13;

/// A bank + number pair. `number` is 0-based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PatchLocation {
    pub bank: u8,
    pub number: u8,
}

impl PatchLocation {
    pub const fn new(bank: u8, number: u8) -> Self {
        Self { bank, number }
    }

    /// Whether the 0-based number is addressable from the editor
    /// (Internal 1..6, Preset 1..90 in user-facing terms).
    pub fn is_valid(&self) -> bool {
        match self.bank {
            INTERNAL_BANK => self.number < INTERNAL_PATCHES,
            PRESET_BANK => self.number < PRESET_PATCHES,
            _ => false,
        }
    }

    /// Only the Internal bank accepts writes.
    pub fn is_writable(&self) -> bool {
        self.bank == INTERNAL_BANK && self.is_valid()
    }

    /// The location after this one, rolling over into the next bank.
    pub fn next(self) -> Self {
        let mut bank = self.bank;
        let mut number = self.number.wrapping_add(1);
        if number >= BANK_SIZE {
            bank += 1;
            number = 0;
            if bank >= BANK_COUNT {
                bank = 0;
            }
        }
        Self { bank, number }
    }

    /// e.g. `Internal001`. `None` for banks without a name.
    pub fn display_name(&self) -> Option<String> {
        let bank = BANK_NAMES.get(self.bank as usize)?;
        Some(alloc::format!("{}{:03}", bank, self.number as u16 + 1))
    }
}

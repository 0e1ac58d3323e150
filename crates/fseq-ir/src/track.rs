//! Operator track selectors and field masks for range edits.

use core::ops::RangeInclusive;

use crate::OPERATOR_COUNT;

/// Selects one operator (1-8) or all of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Track {
    Operator(u8),
    All,
}

impl Track {
    /// Numeric sentinel used by callers that address tracks by index.
    pub const ALL_INDEX: u8 = 9;

    /// Parse a 1-based operator index, or 9 for all operators.
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            1..=8 => Some(Track::Operator(index)),
            Track::ALL_INDEX => Some(Track::All),
            _ => None,
        }
    }

    /// 0-based operator indices covered by this selector.
    pub fn operators(self) -> RangeInclusive<usize> {
        match self {
            Track::Operator(op) => {
                debug_assert!((1..=OPERATOR_COUNT as u8).contains(&op));
                let i = op as usize - 1;
                i..=i
            }
            Track::All => 0..=OPERATOR_COUNT - 1,
        }
    }
}

/// Which parts of a frame an edit touches.
///
/// `voiced` covers voiced frequency + level, `unvoiced` covers unvoiced
/// frequency + level, `pitch` covers the frame's shared pitch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Fields {
    pub voiced: bool,
    pub unvoiced: bool,
    pub pitch: bool,
}

impl Fields {
    pub const ALL: Fields = Fields { voiced: true, unvoiced: true, pitch: true };

    pub const fn new(voiced: bool, unvoiced: bool, pitch: bool) -> Self {
        Self { voiced, unvoiced, pitch }
    }
}

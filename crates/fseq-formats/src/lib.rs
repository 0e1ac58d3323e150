//! Wire formats for the Fseq editor.
//!
//! Encodes and decodes Fseq patches as device bulk-dump SysEx messages,
//! and builds the small control messages used around a dump.

mod fseq_format;
mod sysex;

pub use fseq_format::{
    checksum, checksum_matches, decode, decode_with_report, encode, load_fseq, message_len,
    recognize, DecodeReport, MESSAGE_OVERHEAD,
};
pub use sysex::{
    change_patch_messages, read_header, request_current_dump, DeviceId, DumpHeader, DUMP_TO_INTERNAL,
    DUMP_TO_WORKING_MEMORY, HEADER_LEN,
};

/// Error type for format parsing.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Invalid header or magic bytes
    #[error("not an Fseq bulk dump")]
    InvalidHeader,
    /// Unexpected end of data
    #[error("unexpected end of data")]
    UnexpectedEof,
    /// Format byte outside 0-3
    #[error("unsupported frame format byte {0}")]
    UnsupportedFormat(u8),
    /// Any other failure reading the dump header
    #[error("header read failed: {0}")]
    Header(String),
}

impl From<binrw::Error> for FormatError {
    fn from(err: binrw::Error) -> Self {
        if err.is_eof() {
            return FormatError::UnexpectedEof;
        }
        match err.root_cause() {
            binrw::Error::BadMagic { .. } => FormatError::InvalidHeader,
            _ => FormatError::Header(err.to_string()),
        }
    }
}

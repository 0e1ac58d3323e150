//! Fseq bulk-dump codec.
//!
//! Message layout (all multi-bit values split into 7-bit high/low bytes):
//!
//! ```text
//! 0      F0 43 <dev> 5E <count hi> <count lo> <cmd> 00 <target>
//! 9      name (8, space padded), reserved (8)
//! 25     loop start (2), loop end (2), loop mode, speed adjust,
//!        velocity sensitivity for tempo, pitch mode, note assign,
//!        pitch tuning, sequence delay, format, reserved (2), end step (2)
//! 41     frames, 50 bytes each:
//!          pitch hi, pitch lo
//!          voiced frequency hi x8, voiced frequency lo x8
//!          127 - voiced level x8
//!          unvoiced frequency hi x8, unvoiced frequency lo x8
//!          127 - unvoiced level x8
//! end-2  checksum, F7
//! ```

use fseq_ir::{
    Frame, FrameFormat, LoopMode, PatchLocation, PatchModel, PitchMode, FRAME_BYTES, INTERNAL_BANK,
    INTERNAL_PATCHES, MAX_LEVEL, NAME_LEN, OPERATOR_COUNT,
};

use crate::sysex::{
    DeviceId, DumpHeader, DUMP_TO_INTERNAL, DUMP_TO_WORKING_MEMORY, HEADER_LEN, SYSEX_END,
};
use crate::FormatError;

/// Checksum + terminator.
const TRAILER_LEN: usize = 2;
/// Header + trailer: the message length is `MESSAGE_OVERHEAD + byte_count`.
pub const MESSAGE_OVERHEAD: usize = HEADER_LEN + TRAILER_LEN;
/// Checksummed bytes start at the payload byte count.
const CHECKSUM_START: usize = 4;
/// Offset of the format byte within a message.
const FORMAT_OFFSET: usize = 36;
/// Offset of the target number byte within a message.
const TARGET_OFFSET: usize = 8;
const RESERVED_AFTER_NAME: usize = 8;
const RESERVED_AFTER_FORMAT: usize = 2;

/// Total message length for a format.
pub const fn message_len(format: FrameFormat) -> usize {
    MESSAGE_OVERHEAD + format.byte_count()
}

/// 7-bit two's-complement checksum: the value that brings the low 7 bits
/// of `sum(bytes) + checksum` to zero.
pub fn checksum(bytes: &[u8]) -> u8 {
    let sum = bytes.iter().fold(0u32, |acc, &b| (acc + b as u32) & 0x7F);
    ((128 - sum) & 0x7F) as u8
}

/// Whether the checksum byte stored in a message matches its contents.
pub fn checksum_matches(data: &[u8]) -> bool {
    if data.len() < CHECKSUM_START + TRAILER_LEN {
        return false;
    }
    let slot = data.len() - TRAILER_LEN;
    checksum(&data[CHECKSUM_START..slot]) == data[slot]
}

/// True if `data` has the exact length of one of the four formats and
/// carries the Fseq dump header bytes.
pub fn recognize(data: &[u8]) -> bool {
    FrameFormat::ALL.iter().any(|&f| data.len() == message_len(f))
        && data[0] == 0xF0
        && data[1] == 0x43
        && data[3] == 0x5E
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

struct FseqWriter {
    data: Vec<u8>,
}

impl FseqWriter {
    fn new(capacity: usize) -> Self {
        Self { data: Vec::with_capacity(capacity) }
    }

    fn write_header(&mut self, header: &DumpHeader) {
        self.data.extend_from_slice(&header.to_bytes());
    }

    fn write_u7(&mut self, v: u8) {
        self.data.push(v & 0x7F);
    }

    fn write_u14(&mut self, v: u16) {
        self.data.push(((v >> 7) & 0x7F) as u8);
        self.data.push((v & 0x7F) as u8);
    }

    fn write_zeros(&mut self, n: usize) {
        self.data.resize(self.data.len() + n, 0);
    }

    /// All high bytes first, then all low bytes.
    fn write_planes(&mut self, values: &[u16; OPERATOR_COUNT]) {
        for v in values {
            self.data.push(((v >> 7) & 0x7F) as u8);
        }
        for v in values {
            self.data.push((v & 0x7F) as u8);
        }
    }

    /// Levels are stored with inverted polarity.
    fn write_levels(&mut self, levels: &[u8; OPERATOR_COUNT]) {
        for &level in levels {
            self.data.push(MAX_LEVEL - level.min(MAX_LEVEL));
        }
    }

    fn write_frame(&mut self, frame: &Frame) {
        let ops = frame.operators;
        self.write_u14(frame.pitch);
        self.write_planes(&ops.map(|op| op.voiced_frequency));
        self.write_levels(&ops.map(|op| op.voiced_level));
        self.write_planes(&ops.map(|op| op.unvoiced_frequency));
        self.write_levels(&ops.map(|op| op.unvoiced_level));
    }

    /// Append the checksum over everything after the header's first four
    /// bytes, then the terminator.
    fn finish(mut self) -> Vec<u8> {
        let sum = checksum(&self.data[CHECKSUM_START..]);
        self.data.push(sum);
        self.data.push(SYSEX_END);
        self.data
    }
}

/// Encode a patch as a bulk-dump message.
///
/// The target number byte is 0 when dumping to working memory or to a
/// file, and the patch's stored number otherwise.
pub fn encode(
    model: &PatchModel,
    device: DeviceId,
    to_working_memory: bool,
    to_file: bool,
) -> Vec<u8> {
    let format = model.format;
    let command = if to_working_memory { DUMP_TO_WORKING_MEMORY } else { DUMP_TO_INTERNAL };
    let target = if to_working_memory || to_file { 0 } else { model.location.number };

    let mut w = FseqWriter::new(message_len(format));
    w.write_header(&DumpHeader::new(device, format.byte_count() as u16, command, target));

    let mut name = [b' '; NAME_LEN];
    for (slot, b) in name.iter_mut().zip(model.name.bytes()) {
        *slot = b;
    }
    for b in name {
        w.write_u7(b);
    }
    w.write_zeros(RESERVED_AFTER_NAME);

    w.write_u14(model.loop_start);
    w.write_u14(model.loop_end);
    w.write_u7(model.loop_mode.to_byte());
    w.write_u7(model.speed_adjust);
    w.write_u7(model.velocity_sensitivity_for_tempo);
    w.write_u7(model.pitch_mode.to_byte());
    w.write_u7(model.note_assign);
    w.write_u7(model.pitch_tuning);
    w.write_u7(model.sequence_delay);
    w.write_u7(format.to_byte());
    w.write_zeros(RESERVED_AFTER_FORMAT);
    w.write_u14(model.end_step);

    for frame in model.active_frames() {
        w.write_frame(frame);
    }

    w.finish()
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

struct FseqReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FseqReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn skip(&mut self, n: usize) -> Result<(), FormatError> {
        if self.pos + n > self.data.len() {
            return Err(FormatError::UnexpectedEof);
        }
        self.pos += n;
        Ok(())
    }

    fn read_u7(&mut self) -> Result<u8, FormatError> {
        if self.pos >= self.data.len() {
            return Err(FormatError::UnexpectedEof);
        }
        let v = self.data[self.pos] & 0x7F;
        self.pos += 1;
        Ok(v)
    }

    fn read_u14(&mut self) -> Result<u16, FormatError> {
        let hi = self.read_u7()? as u16;
        let lo = self.read_u7()? as u16;
        Ok((hi << 7) | lo)
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        if self.pos + n > self.data.len() {
            return Err(FormatError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_planes(&mut self) -> Result<[u16; OPERATOR_COUNT], FormatError> {
        let hi = self.read_bytes(OPERATOR_COUNT)?;
        let lo = self.read_bytes(OPERATOR_COUNT)?;
        Ok(core::array::from_fn(|i| {
            ((hi[i] as u16 & 0x7F) << 7) | (lo[i] as u16 & 0x7F)
        }))
    }

    fn read_levels(&mut self) -> Result<[u8; OPERATOR_COUNT], FormatError> {
        let bytes = self.read_bytes(OPERATOR_COUNT)?;
        Ok(core::array::from_fn(|i| MAX_LEVEL - (bytes[i] & 0x7F)))
    }

    fn read_frame(&mut self) -> Result<Frame, FormatError> {
        let mut frame = Frame::zero();
        frame.pitch = self.read_u14()?;
        let voiced = self.read_planes()?;
        let voiced_levels = self.read_levels()?;
        let unvoiced = self.read_planes()?;
        let unvoiced_levels = self.read_levels()?;
        for (i, op) in frame.operators.iter_mut().enumerate() {
            op.voiced_frequency = voiced[i];
            op.voiced_level = voiced_levels[i];
            op.unvoiced_frequency = unvoiced[i];
            op.unvoiced_level = unvoiced_levels[i];
        }
        Ok(frame)
    }
}

/// What a lenient decode actually found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Frames the format byte asked for
    pub frames_expected: usize,
    /// Frames fully present in the buffer
    pub frames_read: usize,
    /// Bytes between the last frame and the checksum slot that were ignored
    pub trailing_bytes: usize,
}

impl DecodeReport {
    pub fn is_truncated(&self) -> bool {
        self.frames_read < self.frames_expected
    }
}

/// Decode a bulk dump into a fresh patch. Never fails; see
/// [`decode_with_report`].
pub fn decode(data: &[u8], from_file: bool) -> PatchModel {
    decode_with_report(data, from_file).0
}

/// Decode a bulk dump, reporting truncation and trailing bytes.
///
/// The checksum is not verified. A short buffer stops decoding early and
/// leaves the remaining frames zeroed; a long one has its extra bytes
/// ignored. A frame is stored whenever all 50 of its bytes are present,
/// even if the checksum and terminator are missing. With `from_file`, the patch is placed in the Internal
/// bank at the embedded number (or 0 if that is out of range).
pub fn decode_with_report(data: &[u8], from_file: bool) -> (PatchModel, DecodeReport) {
    let mut model = PatchModel::default();
    let mut report = DecodeReport::default();

    if from_file {
        let number = data.get(TARGET_OFFSET).copied().unwrap_or(0);
        let number = if number < INTERNAL_PATCHES { number } else { 0 };
        model.location = PatchLocation::new(INTERNAL_BANK, number);
    }

    let mut r = FseqReader::new(data);
    r.seek(HEADER_LEN);
    let format = match read_common(&mut r, &mut model) {
        Ok(format) => format,
        Err(_) => {
            log::warn!(target: "fseq::codec", "truncated Fseq dump: {} bytes, common block incomplete", data.len());
            model.revise();
            return (model, report);
        }
    };
    model.format = format;
    report.frames_expected = format.frame_count();

    for index in 1..=format.frame_count() {
        if r.pos() + FRAME_BYTES > data.len() {
            log::warn!(
                target: "fseq::codec",
                "truncated Fseq dump: {} of {} frames present",
                report.frames_read,
                report.frames_expected
            );
            break;
        }
        match r.read_frame() {
            Ok(frame) => *model.frame_mut(index) = frame,
            Err(_) => break,
        }
        report.frames_read += 1;
    }

    let expected_len = r.pos() + TRAILER_LEN;
    if !report.is_truncated() {
        if data.len() < expected_len {
            log::warn!(target: "fseq::codec", "Fseq dump is missing its checksum or terminator");
        } else if data.len() > expected_len {
            report.trailing_bytes = data.len() - expected_len;
            log::warn!(
                target: "fseq::codec",
                "overlong Fseq dump: ignoring {} trailing bytes",
                report.trailing_bytes
            );
        }
    }

    model.revise();
    (model, report)
}

fn read_common(r: &mut FseqReader, model: &mut PatchModel) -> Result<FrameFormat, FormatError> {
    let name: String = r.read_bytes(NAME_LEN)?.iter().map(|&b| (b & 0x7F) as char).collect();
    model.set_name(&name);
    r.skip(RESERVED_AFTER_NAME)?;

    model.loop_start = r.read_u14()?;
    model.loop_end = r.read_u14()?;
    model.loop_mode = LoopMode::from_byte(r.read_u7()?);
    model.speed_adjust = r.read_u7()?;
    model.velocity_sensitivity_for_tempo = r.read_u7()?;
    model.pitch_mode = PitchMode::from_byte(r.read_u7()?);
    model.note_assign = r.read_u7()?;
    model.pitch_tuning = r.read_u7()?;
    model.sequence_delay = r.read_u7()?;
    let format_byte = r.read_u7()?;
    let format = FrameFormat::from_byte(format_byte).unwrap_or_else(|| {
        log::warn!(target: "fseq::codec", "format byte {} out of range, using 512 frames", format_byte);
        FrameFormat::F512
    });
    r.skip(RESERVED_AFTER_FORMAT)?;
    model.end_step = r.read_u14()?;
    Ok(format)
}

/// Strict loader for inbound buffers: the buffer must be recognized as an
/// Fseq dump with a valid format byte before it is decoded.
pub fn load_fseq(data: &[u8], from_file: bool) -> Result<PatchModel, FormatError> {
    if !recognize(data) {
        return Err(FormatError::InvalidHeader);
    }
    let format_byte = data[FORMAT_OFFSET];
    if FrameFormat::from_byte(format_byte).is_none() {
        return Err(FormatError::UnsupportedFormat(format_byte));
    }
    Ok(decode(data, from_file))
}

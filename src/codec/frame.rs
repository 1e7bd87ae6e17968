//! LZ4 frame decoding
//!
//! Packet files are wrapped in a standard LZ4 frame (magic, frame descriptor,
//! blocks, end mark). The frame layout is walked before anything is
//! decompressed, so input that stops short of a complete frame is rejected
//! instead of decoding to a partial payload. Neither the compressed nor the
//! decompressed size is needed up front.

use std::io::Read;

use lz4_flex::frame::FrameDecoder;
use tracing::trace;

use crate::{RedvoxError, Result};

/// Little-endian LZ4 frame magic number `0x184D2204`.
pub const LZ4_FRAME_MAGIC: [u8; 4] = [0x04, 0x22, 0x4D, 0x18];

const FLG_VERSION_MASK: u8 = 0b1100_0000;
const FLG_VERSION_01: u8 = 0b0100_0000;
const FLG_BLOCK_CHECKSUM: u8 = 0b0001_0000;
const FLG_CONTENT_SIZE: u8 = 0b0000_1000;
const FLG_CONTENT_CHECKSUM: u8 = 0b0000_0100;
const FLG_DICT_ID: u8 = 0b0000_0001;

const END_MARK: u32 = 0;
const UNCOMPRESSED_BLOCK: u32 = 0x8000_0000;
const CHECKSUM_LEN: usize = 4;

/// Decompress an in-memory LZ4 frame.
///
/// Concatenated frames are decoded into one payload. Every frame after the
/// first must also start with [`LZ4_FRAME_MAGIC`].
///
/// # Errors
///
/// Returns [`RedvoxError::FrameFormat`] when the magic is missing, a frame is
/// corrupt or truncated, or bytes that are not a frame follow the last frame.
pub fn decode_frame(raw: &[u8]) -> Result<Vec<u8>> {
    if raw.len() < LZ4_FRAME_MAGIC.len() {
        return Err(RedvoxError::frame_format("input is shorter than the LZ4 frame magic"));
    }

    let mut payload = Vec::new();
    let mut rest = raw;
    let mut frames = 0usize;
    while !rest.is_empty() {
        if !rest.starts_with(&LZ4_FRAME_MAGIC) {
            let found = &rest[..rest.len().min(LZ4_FRAME_MAGIC.len())];
            let details = if frames == 0 {
                format!("expected LZ4 frame magic {:02x?}, found {:02x?}", LZ4_FRAME_MAGIC, found)
            } else {
                format!("{} trailing bytes after LZ4 frame {}", rest.len(), frames)
            };
            return Err(RedvoxError::frame_format(details));
        }

        let (frame, tail) = rest.split_at(frame_len(rest)?);
        FrameDecoder::new(frame).read_to_end(&mut payload).map_err(|err| {
            RedvoxError::frame_format_with_source("corrupt LZ4 frame", Box::new(err))
        })?;
        rest = tail;
        frames += 1;
    }

    trace!(frames, bytes = payload.len(), "Decompressed LZ4 frames");
    Ok(payload)
}

/// Decompress LZ4 frames read from `reader` until it is exhausted.
///
/// # Errors
///
/// Returns [`RedvoxError::Io`] when `reader` itself fails, otherwise the
/// errors of [`decode_frame`].
pub fn decode_frame_from<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    decode_frame(&raw)
}

/// Length in bytes of the complete frame at the start of `frame`.
fn frame_len(frame: &[u8]) -> Result<usize> {
    let mut cursor = FrameCursor { bytes: frame, pos: LZ4_FRAME_MAGIC.len() };

    let flg = cursor.take(1)?[0];
    if flg & FLG_VERSION_MASK != FLG_VERSION_01 {
        return Err(RedvoxError::frame_format(format!(
            "unsupported LZ4 frame descriptor {:#04x}",
            flg
        )));
    }
    // BD
    cursor.skip(1)?;
    if flg & FLG_CONTENT_SIZE != 0 {
        cursor.skip(8)?;
    }
    if flg & FLG_DICT_ID != 0 {
        cursor.skip(4)?;
    }
    // header checksum
    cursor.skip(1)?;

    let block_checksum = if flg & FLG_BLOCK_CHECKSUM != 0 { CHECKSUM_LEN } else { 0 };
    loop {
        let block_size = cursor.read_u32_le()?;
        if block_size == END_MARK {
            break;
        }
        cursor.skip((block_size & !UNCOMPRESSED_BLOCK) as usize)?;
        cursor.skip(block_checksum)?;
    }

    if flg & FLG_CONTENT_CHECKSUM != 0 {
        cursor.skip(CHECKSUM_LEN)?;
    }
    Ok(cursor.pos)
}

struct FrameCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> FrameCursor<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| RedvoxError::frame_format("LZ4 frame is truncated"))?;
        let taken = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(taken)
    }

    fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }

    fn read_u32_le(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

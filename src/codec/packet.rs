//! Packet payload decoding and the composed `deserialize` accessors
//!
//! All three input shapes converge on [`deserialize_reader`]: the input is read
//! to the end, the LZ4 frame is stripped and the payload is parsed.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use prost::Message;
use tracing::debug;

use super::frame::decode_frame;
use crate::{RedvoxError, RedvoxPacketM, Result};

/// Parse a decompressed payload into a packet.
///
/// Decoding is all-or-nothing: malformed length prefixes, wire-type mismatches
/// or truncation return [`RedvoxError::SchemaDecode`] and no partial packet.
pub fn decode_packet(payload: &[u8]) -> Result<RedvoxPacketM> {
    Ok(RedvoxPacketM::decode(payload)?)
}

/// Deserialize a packet from any byte stream.
pub fn deserialize_reader<R: Read>(reader: R) -> Result<RedvoxPacketM> {
    deserialize_reader_with_path(reader, PathBuf::from("<stream>"))
}

/// Deserialize a packet from an in-memory buffer.
pub fn deserialize_bytes(bytes: &[u8]) -> Result<RedvoxPacketM> {
    deserialize_reader_with_path(bytes, PathBuf::from("<memory>"))
}

/// Deserialize a packet from a file on disk.
pub fn deserialize_path<P: AsRef<Path>>(path: P) -> Result<RedvoxPacketM> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| RedvoxError::io_error(path, e))?;

    let packet = deserialize_reader_with_path(BufReader::new(file), path.to_path_buf())?;
    debug!(path = %path.display(), start = packet.start_mach_timestamp(), "Decoded packet");
    Ok(packet)
}

fn deserialize_reader_with_path<R: Read>(mut reader: R, path: PathBuf) -> Result<RedvoxPacketM> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw).map_err(|e| RedvoxError::io_error(path, e))?;

    let payload = decode_frame(&raw)?;
    decode_packet(&payload)
}

//! Packet decoding pipeline
//!
//! A packet file is an LZ4 frame whose payload is a protobuf-encoded
//! [`RedvoxPacketM`](crate::RedvoxPacketM). Decoding happens in two stages:
//! [`frame`] strips the compression wrapper and [`packet`] parses the payload.

pub mod frame;
pub mod packet;

pub use frame::{LZ4_FRAME_MAGIC, decode_frame, decode_frame_from};
pub use packet::{decode_packet, deserialize_bytes, deserialize_path, deserialize_reader};

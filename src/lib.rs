//! Type-safe reader for RedVox API M sensor packets.
//!
//! RedVox stations record audio, location, environmental and device-health
//! channels into packets. Each packet is stored as an LZ4-framed protobuf file
//! named `<station id>_<start epoch micros>.rdvxm`.
//!
//! # Features
//!
//! - **Decoding**: one packet from a buffer, a file or any [`std::io::Read`]
//! - **Selection**: filter files by start time, station id and extension before
//!   paying for decompression
//! - **Directory reads**: walk an unstructured tree and return packets ordered by
//!   machine-clock start time, synchronously or on tokio's blocking pool
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::{TimeZone, Utc};
//! use redvox_m::{ReadFilter, read_unstructured};
//!
//! fn main() -> redvox_m::Result<()> {
//!     let filter = ReadFilter::default()
//!         .with_start(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap())
//!         .with_device_ids(["1637610021"]);
//!
//!     for packet in read_unstructured("/data/redvox/api_m", &filter)? {
//!         println!("{} @ {}", packet.station_id(), packet.start_mach_timestamp());
//!     }
//!     Ok(())
//! }
//! ```

pub mod codec;
mod error;
pub mod filter;
pub mod packet;
pub mod path;
pub mod reader;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use codec::{
    decode_frame, decode_frame_from, decode_packet, deserialize_bytes, deserialize_path,
    deserialize_reader,
};
pub use error::*;
pub use filter::{MalformedNamePolicy, ReadFilter};
pub use packet::RedvoxPacketM;
pub use path::{PathMetadata, parse_path_metadata};
pub use reader::{
    read_unstructured, read_unstructured_concurrent, read_unstructured_default, select_paths,
};

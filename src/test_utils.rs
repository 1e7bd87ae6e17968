//! Test utilities for building packet fixtures on disk
//!
//! Fixtures are generated at test time: a packet is protobuf-encoded, wrapped
//! in an LZ4 frame and written into a temporary directory that is removed when
//! the fixture is dropped.
//!
//! Enabled for unit tests and, through the `test-utils` feature, for
//! integration tests and benches.

use std::io::Write;
use std::path::{Path, PathBuf};

use lz4_flex::frame::FrameEncoder;
use prost::Message;
use tempfile::TempDir;

use crate::RedvoxPacketM;
use crate::packet::redvox_packet_m::{StationInformation, TimingInformation};

/// Install a test subscriber honouring `RUST_LOG`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Wrap `payload` in a single LZ4 frame.
pub fn compress_frame(payload: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut encoder = FrameEncoder::new(Vec::new());
    encoder.write_all(payload)?;
    Ok(encoder.finish()?)
}

/// Encode and compress `packet` the way stations write packet files.
pub fn encode_packet(packet: &RedvoxPacketM) -> anyhow::Result<Vec<u8>> {
    compress_frame(&packet.encode_to_vec())
}

/// A minimal API M packet for `station_id` starting at `start_mach` microseconds.
pub fn sample_packet(station_id: &str, start_mach: f64) -> RedvoxPacketM {
    RedvoxPacketM {
        api: 1000.0,
        station_information: Some(StationInformation {
            id: station_id.to_string(),
            make: "test".to_string(),
            ..Default::default()
        }),
        timing_information: Some(TimingInformation {
            packet_start_mach_timestamp: start_mach,
            packet_end_mach_timestamp: start_mach + 51_200_000.0,
            ..Default::default()
        }),
        // a tiny audio channel, kept opaque
        sensors: vec![0x0a, 0x03, 0x0a, 0x01, 0x41],
        ..Default::default()
    }
}

/// Temporary directory tree of packet files.
pub struct PacketDir {
    temp_dir: TempDir,
}

impl PacketDir {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self { temp_dir: TempDir::new()? })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write an encoded packet at `relative`, creating parent directories.
    pub fn write_packet(&self, relative: &str, packet: &RedvoxPacketM) -> anyhow::Result<PathBuf> {
        self.write_raw(relative, &encode_packet(packet)?)
    }

    /// Write arbitrary bytes at `relative`, creating parent directories.
    pub fn write_raw(&self, relative: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

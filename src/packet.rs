//! API M packet schema
//!
//! Message types for the RedVox API M protobuf schema, declared with `prost`
//! derives so no `protoc` step is needed at build time. Only the station and
//! timing blocks are modelled field by field. The sensor block and event streams
//! are kept as their raw encoded bytes, and fields that are not declared here are
//! skipped by the decoder.

use std::collections::HashMap;

/// A single decoded API M packet.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RedvoxPacketM {
    /// API version the packet was written with (1000 for API M)
    #[prost(float, tag = "1")]
    pub api: f32,

    #[prost(message, optional, tag = "2")]
    pub station_information: Option<redvox_packet_m::StationInformation>,

    #[prost(message, optional, tag = "3")]
    pub timing_information: Option<redvox_packet_m::TimingInformation>,

    /// Encoded `Sensors` message (audio, location, environmental, health channels)
    #[prost(bytes = "vec", tag = "4")]
    pub sensors: Vec<u8>,

    /// Encoded `EventStream` messages
    #[prost(bytes = "vec", repeated, tag = "5")]
    pub event_streams: Vec<Vec<u8>>,

    #[prost(map = "string, string", tag = "6")]
    pub metadata: HashMap<String, String>,
}

/// Nested message types of [`RedvoxPacketM`].
pub mod redvox_packet_m {
    use std::collections::HashMap;

    /// Identity and software of the recording station.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct StationInformation {
        #[prost(string, tag = "1")]
        pub id: String,
        #[prost(string, tag = "2")]
        pub uuid: String,
        #[prost(string, tag = "3")]
        pub description: String,
        #[prost(string, tag = "4")]
        pub auth_id: String,
        #[prost(string, tag = "5")]
        pub make: String,
        #[prost(string, tag = "6")]
        pub model: String,
        /// Operating system enum value as written on the wire
        #[prost(int32, tag = "7")]
        pub os: i32,
        #[prost(string, tag = "8")]
        pub os_version: String,
        #[prost(string, tag = "9")]
        pub app_version: String,
        #[prost(bool, tag = "10")]
        pub is_private: bool,
        #[prost(map = "string, string", tag = "14")]
        pub metadata: HashMap<String, String>,
    }

    /// Packet timing in both the OS and the monotonic machine clock.
    ///
    /// Timestamps are microseconds since the respective epoch.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TimingInformation {
        #[prost(double, tag = "1")]
        pub packet_start_os_timestamp: f64,
        #[prost(double, tag = "2")]
        pub packet_start_mach_timestamp: f64,
        #[prost(double, tag = "3")]
        pub packet_end_os_timestamp: f64,
        #[prost(double, tag = "4")]
        pub packet_end_mach_timestamp: f64,
        #[prost(double, tag = "5")]
        pub server_acquisition_arrival_timestamp: f64,
        #[prost(double, tag = "6")]
        pub app_start_mach_timestamp: f64,
        #[prost(float, tag = "8")]
        pub best_latency: f32,
        #[prost(float, tag = "9")]
        pub best_offset: f32,
        #[prost(float, tag = "10")]
        pub score: f32,
        #[prost(map = "string, string", tag = "13")]
        pub metadata: HashMap<String, String>,
    }
}

impl RedvoxPacketM {
    /// Packet start in machine-clock microseconds.
    ///
    /// Packets without timing information report `0.0`, the protobuf default.
    pub fn start_mach_timestamp(&self) -> f64 {
        self.timing_information.as_ref().map_or(0.0, |timing| timing.packet_start_mach_timestamp)
    }

    /// Station id, or an empty string when the station block is absent.
    pub fn station_id(&self) -> &str {
        self.station_information.as_ref().map_or("", |station| station.id.as_str())
    }
}

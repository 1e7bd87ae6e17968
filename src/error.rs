//! Error types for packet decoding and directory reads.
//!
//! Every fallible operation in this crate returns [`RedvoxError`]. The variants
//! follow the decode pipeline:
//!
//! - **I/O Errors**: a path, stream or directory could not be read
//! - **Frame Errors**: the LZ4 frame wrapper is missing, corrupt or truncated
//! - **Schema Errors**: the decompressed payload is not a valid API M packet
//! - **Path Errors**: a packet-shaped file name carries an unparseable timestamp
//! - **Config Errors**: a read filter configuration could not be loaded
//!
//! ## Batch reads
//!
//! A directory read aborts on the first error. [`RedvoxError::is_recoverable`]
//! tells whether skipping the offending file would have let the batch proceed:
//!
//! ```rust
//! use redvox_m::RedvoxError;
//!
//! let error = RedvoxError::frame_format("missing LZ4 magic");
//! if error.is_recoverable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for packet operations.
pub type Result<T, E = RedvoxError> = std::result::Result<T, E>;

/// Main error type for packet operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RedvoxError {
    #[error("I/O error reading {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid LZ4 frame: {details}")]
    FrameFormat {
        details: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Packet payload does not match the API M schema")]
    SchemaDecode {
        #[source]
        source: prost::DecodeError,
    },

    #[error("Malformed packet file name '{file_name}': {details}")]
    PathFormat { file_name: String, details: String },

    #[error("Invalid read filter configuration: {details}")]
    Config { details: String },

    #[error("Decode task failed: {details}")]
    Task { details: String },
}

impl RedvoxError {
    /// Returns whether a batch read could continue by skipping the offending file.
    pub fn is_recoverable(&self) -> bool {
        match self {
            RedvoxError::FrameFormat { .. } => true,
            RedvoxError::SchemaDecode { .. } => true,
            RedvoxError::PathFormat { .. } => true,
            RedvoxError::Io { .. } => false,
            RedvoxError::Config { .. } => false,
            RedvoxError::Task { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            RedvoxError::Io { .. } => vec![
                "Check the path exists and is readable",
                "Check directory permissions for the whole tree",
            ],
            RedvoxError::FrameFormat { .. } => vec![
                "Verify the file is an LZ4 framed .rdvxm packet",
                "Check for truncated uploads or partial copies",
                "Move the corrupt file out of the scanned directory",
            ],
            RedvoxError::SchemaDecode { .. } => vec![
                "Verify the packet was produced by an API M station",
                "Check the file was not written by an older API version",
            ],
            RedvoxError::PathFormat { .. } => vec![
                "Rename the file to <station>_<epoch micros>.<extension>",
                "Use MalformedNamePolicy::Skip to ignore such files",
            ],
            RedvoxError::Config { .. } => vec![
                "Check the YAML keys: start, end, device_ids, extension, on_malformed_name",
                "Use RFC 3339 timestamps for start and end",
            ],
            RedvoxError::Task { .. } => vec![
                "Check the runtime was not shut down during the read",
                "Retry with the synchronous reader",
            ],
        }
    }

    /// Helper constructor for I/O errors with path context.
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RedvoxError::Io { path: path.into(), source }
    }

    /// Helper constructor for frame errors without an underlying cause.
    pub fn frame_format(details: impl Into<String>) -> Self {
        RedvoxError::FrameFormat { details: details.into(), source: None }
    }

    /// Helper constructor for frame errors with source.
    pub fn frame_format_with_source(
        details: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        RedvoxError::FrameFormat { details: details.into(), source: Some(source) }
    }

    /// Helper constructor for malformed file names.
    pub fn path_format(file_name: impl Into<String>, details: impl Into<String>) -> Self {
        RedvoxError::PathFormat { file_name: file_name.into(), details: details.into() }
    }

    /// Helper constructor for configuration errors.
    pub fn config(details: impl Into<String>) -> Self {
        RedvoxError::Config { details: details.into() }
    }
}

impl From<std::io::Error> for RedvoxError {
    fn from(err: std::io::Error) -> Self {
        RedvoxError::Io { path: PathBuf::from("<unknown>"), source: err }
    }
}

impl From<prost::DecodeError> for RedvoxError {
    fn from(err: prost::DecodeError) -> Self {
        RedvoxError::SchemaDecode { source: err }
    }
}

//! Read filters for selecting packet files
//!
//! A [`ReadFilter`] is checked against the file name before a packet is
//! decoded, so only matching files pay the decompression cost. Filters can be
//! built in code or loaded from YAML:
//!
//! ```rust
//! use redvox_m::ReadFilter;
//!
//! let filter = ReadFilter::from_yaml_str(
//!     r#"
//! start: 2021-01-01T00:00:00Z
//! device_ids: ["1637610021"]
//! "#,
//! )?;
//! assert_eq!(filter.extension.as_deref(), Some("rdvxm"));
//! # Ok::<(), redvox_m::RedvoxError>(())
//! ```

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::path::{PathMetadata, parse_path_metadata};
use crate::{RedvoxError, Result};

/// Extension of API M packet files.
pub const DEFAULT_EXTENSION: &str = "rdvxm";

/// What a filter does with a packet-shaped file name whose start time does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedNamePolicy {
    /// Return the [`RedvoxError::PathFormat`] and abort the read
    #[default]
    Abort,
    /// Log a warning and treat the file as not matching
    Skip,
}

/// Conjunctive filter over file name metadata.
///
/// Every populated bound must hold for a file to be accepted. Time bounds are
/// inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadFilter {
    /// Earliest accepted start time
    pub start: Option<DateTime<Utc>>,

    /// Latest accepted start time
    pub end: Option<DateTime<Utc>>,

    /// Accepted station ids
    pub device_ids: Option<HashSet<String>>,

    /// Required file extension, `None` accepts any
    pub extension: Option<String>,

    /// What to do with a packet-shaped name whose start time does not parse
    pub on_malformed_name: MalformedNamePolicy,
}

impl Default for ReadFilter {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            device_ids: None,
            extension: Some(DEFAULT_EXTENSION.to_string()),
            on_malformed_name: MalformedNamePolicy::Abort,
        }
    }
}

impl ReadFilter {
    /// Load a filter from a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| RedvoxError::config(e.to_string()))
    }

    /// Load a filter from a YAML file.
    pub fn from_yaml_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| RedvoxError::io_error(path, e))?;
        Self::from_yaml_str(&yaml)
    }

    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_device_ids<I, S>(mut self, device_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.device_ids = Some(device_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Drop the extension constraint.
    pub fn with_any_extension(mut self) -> Self {
        self.extension = None;
        self
    }

    pub fn with_malformed_name_policy(mut self, policy: MalformedNamePolicy) -> Self {
        self.on_malformed_name = policy;
        self
    }

    /// Check whether the file at `path` should be read.
    ///
    /// Names that are not packet-shaped are rejected. A packet-shaped name with
    /// an unparseable start time is handled per [`MalformedNamePolicy`].
    pub fn accepts<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        let path = path.as_ref();
        let metadata = match parse_path_metadata(path) {
            Ok(Some(metadata)) => metadata,
            Ok(None) => {
                trace!(path = %path.display(), "Not a packet file name");
                return Ok(false);
            }
            Err(err @ RedvoxError::PathFormat { .. })
                if self.on_malformed_name == MalformedNamePolicy::Skip =>
            {
                warn!(path = %path.display(), error = %err, "Skipping malformed packet file name");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        Ok(self.accepts_metadata(&metadata))
    }

    /// Check already-parsed metadata against the bounds of this filter.
    pub fn accepts_metadata(&self, metadata: &PathMetadata) -> bool {
        if self.start.is_some_and(|start| metadata.start < start) {
            return false;
        }

        if self.end.is_some_and(|end| metadata.start > end) {
            return false;
        }

        if let Some(device_ids) = &self.device_ids {
            if !device_ids.contains(&metadata.device_id) {
                return false;
            }
        }

        if let Some(extension) = &self.extension {
            if metadata.extension != *extension {
                return false;
            }
        }

        true
    }
}

//! Packet file name parsing
//!
//! Packet files are named `<station id>_<start epoch micros>.<extension>`, for
//! example `1637610021_1609459200123456.rdvxm`. The name is split on `_` and
//! `.` alike, so a station id or extension that itself contains either
//! character yields more than three components and the file is not recognised.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{RedvoxError, Result};

const SEPARATORS: [char; 2] = ['_', '.'];

/// Station id, start time and extension encoded in a packet file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathMetadata {
    /// Station (device) identifier
    pub device_id: String,

    /// Packet start, truncated to whole milliseconds
    pub start: DateTime<Utc>,

    /// File extension without the separator
    pub extension: String,
}

impl PathMetadata {
    /// Parse a bare file name.
    ///
    /// Returns `Ok(None)` unless the name has exactly three components. A name of
    /// the right shape whose middle component is not an integer is a
    /// [`RedvoxError::PathFormat`]. So is an integer start that falls outside the
    /// range [`DateTime<Utc>`] can represent (roughly beyond year 262143).
    pub fn parse(file_name: &str) -> Result<Option<Self>> {
        let components: Vec<&str> = file_name.split(SEPARATORS).collect();
        let [device_id, micros, extension] = components[..] else {
            return Ok(None);
        };

        let micros: i64 = micros.parse().map_err(|e| {
            RedvoxError::path_format(file_name, format!("start '{}' is not an integer: {}", micros, e))
        })?;

        let start = DateTime::from_timestamp_millis(micros / 1000).ok_or_else(|| {
            RedvoxError::path_format(file_name, format!("start {} is out of range", micros))
        })?;

        Ok(Some(Self { device_id: device_id.to_string(), start, extension: extension.to_string() }))
    }

    /// Start time as epoch microseconds, at millisecond precision.
    pub fn start_micros(&self) -> i64 {
        self.start.timestamp_millis() * 1000
    }

    /// Canonical file name for this metadata.
    pub fn file_name(&self) -> String {
        format!("{}_{}.{}", self.device_id, self.start_micros(), self.extension)
    }
}

/// Parse the file name component of `path`.
///
/// Paths without a file name, or whose file name is not valid UTF-8, are not
/// packet files and yield `Ok(None)`.
pub fn parse_path_metadata<P: AsRef<Path>>(path: P) -> Result<Option<PathMetadata>> {
    match path.as_ref().file_name().and_then(|name| name.to_str()) {
        Some(file_name) => PathMetadata::parse(file_name),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn parses_underscore_and_dot_separated_names() {
        for name in ["devA_1000000000_rdvxm", "devA_1000000000.rdvxm", "devA.1000000000.rdvxm"] {
            let metadata = PathMetadata::parse(name).unwrap().expect("three components");
            assert_eq!(metadata.device_id, "devA");
            assert_eq!(metadata.extension, "rdvxm");
            assert_eq!(metadata.start, Utc.with_ymd_and_hms(1970, 1, 1, 0, 16, 40).unwrap());
        }
    }

    #[test]
    fn only_the_file_name_is_parsed() {
        let metadata = parse_path_metadata("/data/api_m/2021.01/devB_2000000000.rdvxm")
            .unwrap()
            .expect("file name has three components");
        assert_eq!(metadata.device_id, "devB");
        assert_eq!(metadata.start, Utc.with_ymd_and_hms(1970, 1, 1, 0, 33, 20).unwrap());
    }

    #[test]
    fn sub_millisecond_precision_is_truncated() {
        let metadata = PathMetadata::parse("dev_1609459200123999.rdvxm").unwrap().unwrap();
        assert_eq!(metadata.start.timestamp_millis(), 1_609_459_200_123);
        assert_eq!(metadata.start_micros(), 1_609_459_200_123_000);
    }

    #[test]
    fn negative_starts_truncate_toward_zero() {
        let metadata = PathMetadata::parse("dev_-1500.rdvxm").unwrap().unwrap();
        assert_eq!(metadata.start.timestamp_millis(), -1);
    }

    #[test]
    fn wrong_shapes_are_not_packet_names() {
        for name in ["", "README", "notes.txt", "a_b_c_d", "dev_1_rdvxm.bak", "my.dev_1.rdvxm"] {
            assert!(PathMetadata::parse(name).unwrap().is_none(), "{name} should not parse");
        }
        assert!(parse_path_metadata("/").unwrap().is_none());
    }

    #[test]
    fn empty_components_keep_the_shape() {
        let metadata = PathMetadata::parse("_1000_").unwrap().unwrap();
        assert_eq!(metadata.device_id, "");
        assert_eq!(metadata.extension, "");
    }

    #[test]
    fn non_numeric_start_is_path_format_error() {
        for name in ["devA_notatime.rdvxm", "devA_.rdvxm", "devA_12a.rdvxm", "devA_99999999999999999999.rdvxm"] {
            let err = PathMetadata::parse(name).unwrap_err();
            assert!(matches!(err, RedvoxError::PathFormat { .. }), "{name}: {err:?}");
        }
    }

    #[test]
    fn out_of_range_start_is_path_format_error() {
        let err = PathMetadata::parse(&format!("dev_{}.rdvxm", i64::MAX)).unwrap_err();
        assert!(matches!(err, RedvoxError::PathFormat { .. }), "{err:?}");
    }

    proptest! {
        #[test]
        fn file_name_round_trips(
            device_id in "[A-Za-z0-9-]{0,16}",
            micros in -8_000_000_000_000_000i64..8_000_000_000_000_000i64,
            extension in "[a-z0-9]{0,8}",
        ) {
            let name = format!("{}_{}.{}", device_id, micros, extension);
            let metadata = PathMetadata::parse(&name).unwrap().expect("valid name");

            prop_assert_eq!(&metadata.device_id, &device_id);
            prop_assert_eq!(&metadata.extension, &extension);
            prop_assert_eq!(metadata.start_micros(), (micros / 1000) * 1000);

            let reparsed = PathMetadata::parse(&metadata.file_name()).unwrap();
            prop_assert_eq!(reparsed, Some(metadata));
        }

        #[test]
        fn other_component_counts_never_error(parts in prop::collection::vec("[A-Za-z0-9]{0,6}", 0..7usize)) {
            prop_assume!(parts.len() != 3);
            let name = parts.join("_");
            prop_assert!(PathMetadata::parse(&name).unwrap().is_none());
        }

        #[test]
        fn non_numeric_middle_component_errors(
            device_id in "[A-Za-z0-9]{1,8}",
            middle in "[A-Za-z][A-Za-z0-9]{0,8}",
        ) {
            let name = format!("{}_{}.rdvxm", device_id, middle);
            let is_path_format_error = matches!(PathMetadata::parse(&name), Err(RedvoxError::PathFormat { .. }));
            prop_assert!(is_path_format_error);
        }
    }
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format of a partition derived from a timestamp, e.g. `2024/01/02/03:04:05/`.
const PARTITION_FORMAT: &str = "%Y/%m/%d/%H:%M:%S/";

/// Path segment grouping every object written by one invocation.
///
/// Partitions created by this crate are zero-padded `YYYY/MM/DD/HH:MM:SS/` strings with a
/// trailing slash. A partition received from a trigger event is kept as an opaque string and
/// echoed unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimePartition(String);

impl TimePartition {
    /// Builds the partition for `timestamp`.
    pub fn from_datetime(timestamp: DateTime<Utc>) -> Self {
        Self(timestamp.format(PARTITION_FORMAT).to_string())
    }

    /// Builds the partition for the current UTC time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for TimePartition {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TimePartition {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TimePartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn partition_is_zero_padded_with_trailing_slash() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        let partition = TimePartition::from_datetime(timestamp);

        assert_eq!(partition.as_str(), "2024/01/02/03:04:05/");
    }

    #[test]
    fn opaque_partitions_round_trip_through_json() {
        let partition = TimePartition::from("YYYY/MM/DD/HH:MM:SS/");

        let json = serde_json::to_string(&partition).unwrap();
        let decoded: TimePartition = serde_json::from_str(&json).unwrap();

        assert_eq!(json, "\"YYYY/MM/DD/HH:MM:SS/\"");
        assert_eq!(decoded, partition);
    }
}

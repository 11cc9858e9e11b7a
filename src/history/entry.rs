//! A single committed calculation.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One line of calculator history.
///
/// Serialized as `{"expr": ..., "result": ..., "time": ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The expression as the user typed it.
    #[serde(rename = "expr")]
    pub expression: String,
    /// The committed result.
    pub result: f64,
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "time")]
    pub timestamp_millis: i64,
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: f64, timestamp_millis: i64) -> Self {
        Self {
            expression: expression.into(),
            result,
            timestamp_millis,
        }
    }

    /// Create an entry stamped with the current time.
    pub fn now(expression: impl Into<String>, result: f64) -> Self {
        Self::new(expression, result, now_millis())
    }
}

pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_field_names() {
        let entry = HistoryEntry::new("2+2", 4.0, 1_700_000_000_000);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"expr":"2+2","result":4.0,"time":1700000000000}"#);
    }

    #[test]
    fn test_reads_integer_results() {
        let entry: HistoryEntry =
            serde_json::from_str(r#"{"expr":"5%","result":0.05,"time":1}"#).unwrap();
        assert_eq!(entry, HistoryEntry::new("5%", 0.05, 1));

        let entry: HistoryEntry =
            serde_json::from_str(r#"{"expr":"2+2","result":4,"time":2}"#).unwrap();
        assert_eq!(entry.result, 4.0);
    }

    #[test]
    fn test_now_is_recent() {
        let entry = HistoryEntry::now("1+1", 2.0);
        assert!(entry.timestamp_millis > 1_600_000_000_000);
    }
}

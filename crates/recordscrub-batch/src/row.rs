//! Input and output rows

use serde::{Deserialize, Serialize};

/// One input row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Opaque identifier, echoed verbatim
    pub record_id: String,

    /// Serialized key/value payload
    pub payload: String,
}

impl RawRecord {
    pub fn new(record_id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            payload: payload.into(),
        }
    }
}

/// How a row's output was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    /// The payload was parsed and redacted
    Redacted,

    /// The payload was blank
    Empty,

    /// The payload could not be parsed; it was passed through unchecked
    Unparseable,
}

impl RowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RowStatus::Redacted => "redacted",
            RowStatus::Empty => "empty",
            RowStatus::Unparseable => "unparseable",
        }
    }
}

/// One output row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactedRow {
    pub record_id: String,
    pub redacted_payload: String,
    pub is_pii: bool,
    pub status: RowStatus,
}

//! Record redaction

mod standard_redactor;

pub use standard_redactor::StandardRedactor;

use crate::error::{Error, Result};
use crate::masker::MaskerConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Redacted copy of a record
#[derive(Debug, Clone, PartialEq)]
pub struct RedactionResult {
    /// Every input key, masked or verbatim, in input order
    pub record: Map<String, Value>,

    /// Whether any PII was found
    pub is_pii: bool,

    /// Whether the combinatorial rule fired
    pub escalated: bool,
}

impl RedactionResult {
    /// Result for an empty record
    pub fn empty() -> Self {
        Self {
            record: Map::new(),
            is_pii: false,
            escalated: false,
        }
    }

    /// Serialize the redacted record as compact JSON
    pub fn to_json(&self) -> String {
        Value::Object(self.record.clone()).to_string()
    }
}

/// Outcome of redacting a raw payload
#[derive(Debug, Clone, PartialEq)]
pub enum RedactionOutcome {
    /// The payload was parsed and redacted
    Redacted(RedactionResult),

    /// The payload is not a JSON object; detection was not attempted
    Unparseable { raw: String, reason: String },
}

impl RedactionOutcome {
    /// PII flag; an unparseable payload is never flagged
    pub fn is_pii(&self) -> bool {
        match self {
            RedactionOutcome::Redacted(result) => result.is_pii,
            RedactionOutcome::Unparseable { .. } => false,
        }
    }

    /// The redaction result, if the payload could be checked
    pub fn result(&self) -> Option<&RedactionResult> {
        match self {
            RedactionOutcome::Redacted(result) => Some(result),
            RedactionOutcome::Unparseable { .. } => None,
        }
    }
}

/// Trait for redacting PII from records
pub trait RecordRedactor: Send + Sync {
    /// Redact an already-parsed record
    fn redact_record(&self, record: &Map<String, Value>) -> RedactionResult;

    /// Parse and redact a raw JSON payload
    fn redact_payload(&self, raw: &str) -> RedactionOutcome;
}

/// Configuration for record redaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedactorConfig {
    /// Masking settings
    pub masking: MaskerConfig,

    /// Number of co-occurring quasi-identifiers that triggers full redaction
    pub combinatorial_threshold: usize,
}

impl Default for RedactorConfig {
    fn default() -> Self {
        Self {
            masking: MaskerConfig::default(),
            combinatorial_threshold: 2,
        }
    }
}

impl RedactorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.combinatorial_threshold == 0 {
            return Err(Error::InvalidConfig(
                "combinatorial_threshold must be at least 1".to_string(),
            ));
        }

        self.masking.validate()
    }
}

//! Per-field maskers

mod standard_masker;

pub use standard_masker::StandardMasker;

use crate::error::{Error, Result};
use crate::field::PIIField;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// Placeholder written wherever a value is fully redacted
pub const REDACTION_TOKEN: &str = "[REDACTED_PII]";

/// Character substituted for hidden digits and letters in partial masks
pub const DEFAULT_MASK_CHAR: char = 'X';

/// Trait for masking the value of a direct-PII field
///
/// Implementations must be total: any value shape is accepted and a value
/// that cannot be masked partially falls back to full redaction.
pub trait FieldMasker: Send + Sync {
    /// Mask a single field value
    fn mask(&self, field: PIIField, value: &Value) -> String;

    /// The value written when a field is fully redacted
    fn full_redaction(&self) -> String;
}

/// Configuration for the maskers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskerConfig {
    /// Character used for partial masks
    pub mask_char: char,

    /// Token used for full redaction
    pub redaction_token: String,
}

impl Default for MaskerConfig {
    fn default() -> Self {
        Self {
            mask_char: DEFAULT_MASK_CHAR,
            redaction_token: REDACTION_TOKEN.to_string(),
        }
    }
}

impl MaskerConfig {
    /// Reject settings that would let a masked value be mistaken for data
    pub fn validate(&self) -> Result<()> {
        if self.mask_char.is_ascii_digit() || self.mask_char == '@' {
            return Err(Error::InvalidConfig(format!(
                "mask_char '{}' collides with characters that are kept visible",
                self.mask_char
            )));
        }

        if self.mask_char.is_whitespace() || self.mask_char.is_control() {
            return Err(Error::InvalidConfig(
                "mask_char must be a visible character".to_string(),
            ));
        }

        if self.redaction_token.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "redaction_token must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Coerce a JSON value to the text a masker works on
///
/// Strings are used as-is, scalars by their JSON text, `null` as the empty
/// string and containers by their compact JSON encoding.
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

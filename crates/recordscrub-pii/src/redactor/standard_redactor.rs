//! Standard record redactor implementation

use crate::error::Result;
use crate::field::FieldClass;
use crate::masker::{FieldMasker, StandardMasker};
use crate::redactor::{RecordRedactor, RedactionOutcome, RedactionResult, RedactorConfig};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Standard implementation of record redaction
///
/// Each direct-PII key is masked by its own masker. When the number of
/// quasi-identifiers present reaches the combinatorial threshold, every one
/// of them is overwritten with the full redaction token.
pub struct StandardRedactor {
    config: RedactorConfig,
    masker: Arc<dyn FieldMasker>,
}

impl StandardRedactor {
    /// Create a new standard redactor with the given configuration
    pub fn new(config: RedactorConfig) -> Result<Self> {
        config.validate()?;
        let masker = StandardMasker::new(config.masking.clone())?;

        Ok(Self {
            config,
            masker: Arc::new(masker),
        })
    }

    /// Create a redactor that uses a custom masker
    pub fn with_masker(config: RedactorConfig, masker: Arc<dyn FieldMasker>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, masker })
    }

    /// Get the redactor configuration
    pub fn config(&self) -> &RedactorConfig {
        &self.config
    }
}

impl RecordRedactor for StandardRedactor {
    fn redact_record(&self, record: &Map<String, Value>) -> RedactionResult {
        let mut output = Map::with_capacity(record.len());
        let mut is_pii = false;
        let mut quasi_identifiers = Vec::new();

        for (key, value) in record {
            match FieldClass::of(key) {
                FieldClass::Exempt | FieldClass::PassThrough => {
                    output.insert(key.clone(), value.clone());
                }
                FieldClass::DirectPII(field) => {
                    is_pii = true;
                    if field.is_combinatorial() {
                        quasi_identifiers.push(key);
                    }
                    output.insert(key.clone(), Value::String(self.masker.mask(field, value)));
                }
            }
        }

        let escalated = quasi_identifiers.len() >= self.config.combinatorial_threshold;
        if escalated {
            is_pii = true;
            for key in &quasi_identifiers {
                if let Some(slot) = output.get_mut(key.as_str()) {
                    *slot = Value::String(self.masker.full_redaction());
                }
            }

            debug!(
                fields = ?quasi_identifiers,
                "Combinatorial PII threshold met, fields fully redacted"
            );
        }

        RedactionResult {
            record: output,
            is_pii,
            escalated,
        }
    }

    fn redact_payload(&self, raw: &str) -> RedactionOutcome {
        if raw.trim().is_empty() {
            return RedactionOutcome::Redacted(RedactionResult::empty());
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(record)) => RedactionOutcome::Redacted(self.redact_record(&record)),
            Ok(other) => RedactionOutcome::Unparseable {
                raw: raw.to_string(),
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            },
            Err(e) => RedactionOutcome::Unparseable {
                raw: raw.to_string(),
                reason: e.to_string(),
            },
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

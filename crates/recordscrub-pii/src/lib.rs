//! RecordScrub PII Redaction
//!
//! This crate provides the per-record redaction engine:
//! - Field catalogue (direct-PII, combinatorial and exempt keys)
//! - Per-field maskers (phone, aadhar, passport, upi, email, full redaction)
//! - Combinatorial escalation when several quasi-identifiers co-occur

pub mod error;
pub mod field;
pub mod masker;
pub mod redactor;

pub use error::{Error, Result};
pub use field::{EXEMPT_KEYS, FieldClass, PIIField, is_exempt};
pub use masker::{DEFAULT_MASK_CHAR, FieldMasker, MaskerConfig, REDACTION_TOKEN, StandardMasker};
pub use redactor::{
    RecordRedactor, RedactionOutcome, RedactionResult, RedactorConfig, StandardRedactor,
};

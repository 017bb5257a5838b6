//! Batch driver
//!
//! Feeds each input row to the redactor and writes one output row per input
//! row. Failures are contained to the row that caused them:
//! - Blank payloads produce `{}` with `is_pii = false`, without calling the engine
//! - Unparseable payloads follow the configured [`MalformedPolicy`]
//! - Unreadable input rows are logged and skipped unless `fail_fast` is set

use crate::error::Result;
use crate::row::{RawRecord, RedactedRow, RowStatus};
use crate::sink::RecordSink;
use recordscrub_pii::{RecordRedactor, RedactionOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// What to do with a payload that is not a JSON object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Emit the raw text unchanged with `is_pii = false` and status `unparseable`
    #[default]
    Passthrough,

    /// Emit nothing for the row
    Skip,
}

impl FromStr for MalformedPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "passthrough" => Ok(MalformedPolicy::Passthrough),
            "skip" => Ok(MalformedPolicy::Skip),
            other => Err(format!(
                "Invalid malformed-payload policy '{}'. Use 'passthrough' or 'skip'",
                other
            )),
        }
    }
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedPolicy::Passthrough => write!(f, "passthrough"),
            MalformedPolicy::Skip => write!(f, "skip"),
        }
    }
}

/// Configuration for a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Policy for unparseable payloads
    pub on_malformed: MalformedPolicy,

    /// Add a `status` column to the output
    pub emit_status: bool,

    /// Abort on the first unreadable input row instead of skipping it
    pub fail_fast: bool,
}

/// Counters for a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Input rows read successfully
    pub total: usize,

    /// Rows parsed and redacted
    pub redacted: usize,

    /// Rows flagged as containing PII
    pub pii: usize,

    /// Rows where the combinatorial rule fired
    pub escalated: usize,

    /// Rows with a blank payload
    pub empty: usize,

    /// Rows whose payload could not be parsed
    pub unparseable: usize,

    /// Rows left out of the output
    pub skipped: usize,

    /// Input rows that could not be read
    pub source_errors: usize,
}

impl BatchSummary {
    /// Rows written to the sink
    pub fn written(&self) -> usize {
        self.total - self.skipped
    }
}

/// Run the redactor over every row of `source`, writing results to `sink`
pub fn run_batch<R, I, S>(
    redactor: &R,
    source: I,
    sink: &mut S,
    config: &BatchConfig,
) -> Result<BatchSummary>
where
    R: RecordRedactor + ?Sized,
    I: IntoIterator<Item = Result<RawRecord>>,
    S: RecordSink + ?Sized,
{
    let mut summary = BatchSummary::default();

    for item in source {
        let record = match item {
            Ok(record) => record,
            Err(e) => {
                summary.source_errors += 1;
                if config.fail_fast || !e.is_row_level() {
                    return Err(e);
                }
                warn!(error = %e, "Skipping unreadable input row");
                continue;
            }
        };

        summary.total += 1;
        if let Some(row) = process_record(redactor, record, config, &mut summary) {
            sink.write_row(&row)?;
        }
    }

    sink.finish()?;

    info!(
        total = summary.total,
        written = summary.written(),
        pii = summary.pii,
        escalated = summary.escalated,
        empty = summary.empty,
        unparseable = summary.unparseable,
        skipped = summary.skipped,
        source_errors = summary.source_errors,
        "Batch complete"
    );

    Ok(summary)
}

fn process_record<R>(
    redactor: &R,
    record: RawRecord,
    config: &BatchConfig,
    summary: &mut BatchSummary,
) -> Option<RedactedRow>
where
    R: RecordRedactor + ?Sized,
{
    let RawRecord { record_id, payload } = record;

    if payload.trim().is_empty() {
        debug!(record_id = %record_id, "Blank payload");
        summary.empty += 1;
        return Some(RedactedRow {
            record_id,
            redacted_payload: "{}".to_string(),
            is_pii: false,
            status: RowStatus::Empty,
        });
    }

    match redactor.redact_payload(&payload) {
        RedactionOutcome::Redacted(result) => {
            summary.redacted += 1;
            if result.is_pii {
                summary.pii += 1;
            }
            if result.escalated {
                summary.escalated += 1;
            }

            debug!(
                record_id = %record_id,
                is_pii = result.is_pii,
                escalated = result.escalated,
                "Record redacted"
            );

            Some(RedactedRow {
                record_id,
                redacted_payload: result.to_json(),
                is_pii: result.is_pii,
                status: RowStatus::Redacted,
            })
        }
        RedactionOutcome::Unparseable { raw, reason } => {
            summary.unparseable += 1;

            match config.on_malformed {
                MalformedPolicy::Passthrough => {
                    warn!(
                        record_id = %record_id,
                        reason = %reason,
                        "Unparseable payload passed through without PII detection"
                    );
                    Some(RedactedRow {
                        record_id,
                        redacted_payload: raw,
                        is_pii: false,
                        status: RowStatus::Unparseable,
                    })
                }
                MalformedPolicy::Skip => {
                    warn!(
                        record_id = %record_id,
                        reason = %reason,
                        "Skipping record with unparseable payload"
                    );
                    summary.skipped += 1;
                    None
                }
            }
        }
    }
}

impl From<MalformedPolicy> for BatchConfig {
    fn from(on_malformed: MalformedPolicy) -> Self {
        Self {
            on_malformed,
            ..Self::default()
        }
    }
}

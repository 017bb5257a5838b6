//! RecordScrub batch processing
//!
//! Drives the redaction engine over a dataset of `(record_id, data_json)`
//! rows and writes `(record_id, redacted_data_json, is_pii)` rows:
//! - CSV and JSONL record sources
//! - CSV, JSONL and in-memory sinks
//! - Per-row error isolation with a configurable malformed-payload policy

pub mod driver;
pub mod error;
pub mod row;
pub mod sink;
pub mod source;

pub use driver::{BatchConfig, BatchSummary, MalformedPolicy, run_batch};
pub use error::{BatchError, Result};
pub use row::{RawRecord, RedactedRow, RowStatus};
pub use sink::{CsvSink, JsonlSink, MemorySink, RecordSink, open_sink};
pub use source::{CsvSource, DataFormat, JsonlSource, RecordSource, open_source};

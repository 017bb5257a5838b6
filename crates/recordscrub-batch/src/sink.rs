//! Record sinks

use crate::error::Result;
use crate::row::{RedactedRow, RowStatus};
use crate::source::DataFormat;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Header of the CSV output
pub const OUTPUT_COLUMNS: [&str; 3] = ["record_id", "redacted_data_json", "is_pii"];

/// Trait for redacted row writers
pub trait RecordSink {
    /// Write a single row
    fn write_row(&mut self, row: &RedactedRow) -> Result<()>;

    /// Flush any pending writes
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// CSV sink writing `is_pii` as `0`/`1`
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    emit_status: bool,
}

impl CsvSink<File> {
    /// Create (or truncate) a CSV file
    pub fn create(path: impl AsRef<Path>, emit_status: bool) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Self::new(file, emit_status)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap a writer; the header is written immediately
    pub fn new(writer: W, emit_status: bool) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(writer);

        if emit_status {
            writer.write_record(OUTPUT_COLUMNS.iter().chain(std::iter::once(&"status")))?;
        } else {
            writer.write_record(OUTPUT_COLUMNS)?;
        }

        Ok(Self {
            writer,
            emit_status,
        })
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()).into())
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_row(&mut self, row: &RedactedRow) -> Result<()> {
        let is_pii = if row.is_pii { "1" } else { "0" };

        if self.emit_status {
            self.writer.write_record([
                row.record_id.as_str(),
                row.redacted_payload.as_str(),
                is_pii,
                row.status.as_str(),
            ])?;
        } else {
            self.writer.write_record([
                row.record_id.as_str(),
                row.redacted_payload.as_str(),
                is_pii,
            ])?;
        }

        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonlOutputRow<'a> {
    record_id: &'a str,
    redacted_data_json: &'a str,
    is_pii: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<RowStatus>,
}

/// JSON Lines sink writing `is_pii` as a boolean
pub struct JsonlSink<W: Write> {
    writer: BufWriter<W>,
    emit_status: bool,
}

impl JsonlSink<File> {
    /// Create (or truncate) a JSONL file
    pub fn create(path: impl AsRef<Path>, emit_status: bool) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self::new(file, emit_status))
    }
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W, emit_status: bool) -> Self {
        Self {
            writer: BufWriter::new(writer),
            emit_status,
        }
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error().into())
    }
}

impl<W: Write> RecordSink for JsonlSink<W> {
    fn write_row(&mut self, row: &RedactedRow) -> Result<()> {
        let output = JsonlOutputRow {
            record_id: &row.record_id,
            redacted_data_json: &row.redacted_payload,
            is_pii: row.is_pii,
            status: self.emit_status.then_some(row.status),
        };

        serde_json::to_writer(&mut self.writer, &output)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Sink that keeps rows in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub rows: Vec<RedactedRow>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for MemorySink {
    fn write_row(&mut self, row: &RedactedRow) -> Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }
}

/// Create a file sink, inferring the format from the extension when not given
pub fn open_sink(
    path: impl AsRef<Path>,
    format: Option<DataFormat>,
    emit_status: bool,
) -> Result<Box<dyn RecordSink>> {
    let path = path.as_ref();
    let format = format.unwrap_or_else(|| DataFormat::from_path(path));

    Ok(match format {
        DataFormat::Csv => Box::new(CsvSink::create(path, emit_status)?),
        DataFormat::Jsonl => Box::new(JsonlSink::create(path, emit_status)?),
    })
}

//! Record sources

use crate::error::{BatchError, Result};
use crate::row::RawRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Column holding the record identifier
pub const RECORD_ID_COLUMN: &str = "record_id";

/// Column holding the serialized payload
pub const PAYLOAD_COLUMN: &str = "data_json";

/// Tabular file format for sources and sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Csv,
    Jsonl,
}

impl DataFormat {
    /// Infer the format from a file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("jsonl") | Some("ndjson") => DataFormat::Jsonl,
            _ => DataFormat::Csv,
        }
    }
}

impl FromStr for DataFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(DataFormat::Csv),
            "jsonl" | "ndjson" => Ok(DataFormat::Jsonl),
            other => Err(format!("Invalid format '{}'. Use 'csv' or 'jsonl'", other)),
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFormat::Csv => write!(f, "csv"),
            DataFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// A stream of input rows
///
/// Row-level errors are yielded in place so the caller can decide whether
/// to skip the row or stop.
pub trait RecordSource: Iterator<Item = Result<RawRecord>> {}

impl<T: Iterator<Item = Result<RawRecord>>> RecordSource for T {}

/// Headered CSV source
///
/// Columns are located by name; extra columns are ignored and missing
/// cells read as empty strings.
pub struct CsvSource<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    id_index: usize,
    payload_index: usize,
}

impl CsvSource<File> {
    /// Open a CSV file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }
}

impl<R: Read> CsvSource<R> {
    /// Create a source from any reader
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| BatchError::MissingColumn(name.to_string()))
        };

        let id_index = column(RECORD_ID_COLUMN)?;
        let payload_index = column(PAYLOAD_COLUMN)?;

        Ok(Self {
            records: reader.into_records(),
            id_index,
            payload_index,
        })
    }
}

impl<R: Read> Iterator for CsvSource<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;

        Some(record.map_err(BatchError::from).map(|record| {
            RawRecord::new(
                record.get(self.id_index).unwrap_or_default(),
                record.get(self.payload_index).unwrap_or_default(),
            )
        }))
    }
}

#[derive(Deserialize)]
struct JsonlRow {
    record_id: Value,
    #[serde(default)]
    data_json: Value,
}

/// JSON Lines source
///
/// Each line is an object with `record_id` and `data_json`. The payload may
/// be a string holding JSON text or an inline JSON object.
pub struct JsonlSource<R: BufRead> {
    lines: io::Lines<R>,
    line_num: usize,
}

impl JsonlSource<BufReader<File>> {
    /// Open a JSONL file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonlSource<R> {
    /// Create a source from any buffered reader
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_num: 0,
        }
    }

    fn parse_line(&self, line: &str) -> Result<RawRecord> {
        let row: JsonlRow = serde_json::from_str(line).map_err(|e| BatchError::Row {
            line: self.line_num,
            message: e.to_string(),
        })?;

        let record_id = match row.record_id {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            other => {
                return Err(BatchError::Row {
                    line: self.line_num,
                    message: format!("record_id must be a string or number, got {}", other),
                });
            }
        };

        let payload = match row.data_json {
            Value::String(s) => s,
            Value::Null => String::new(),
            inline => inline.to_string(),
        };

        Ok(RawRecord::new(record_id, payload))
    }
}

impl<R: BufRead> Iterator for JsonlSource<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_num += 1;

            if line.trim().is_empty() {
                continue;
            }

            return Some(self.parse_line(&line));
        }
    }
}

/// Open a file source, inferring the format from the extension when not given
pub fn open_source(
    path: impl AsRef<Path>,
    format: Option<DataFormat>,
) -> Result<Box<dyn RecordSource>> {
    let path = path.as_ref();
    let format = format.unwrap_or_else(|| DataFormat::from_path(path));

    Ok(match format {
        DataFormat::Csv => Box::new(CsvSource::open(path)?),
        DataFormat::Jsonl => Box::new(JsonlSource::open(path)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(DataFormat::from_path(Path::new("in.csv")), DataFormat::Csv);
        assert_eq!(DataFormat::from_path(Path::new("in.jsonl")), DataFormat::Jsonl);
        assert_eq!(DataFormat::from_path(Path::new("in.NDJSON")), DataFormat::Jsonl);
        assert_eq!(DataFormat::from_path(Path::new("in")), DataFormat::Csv);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<DataFormat>().unwrap(), DataFormat::Csv);
        assert_eq!("jsonl".parse::<DataFormat>().unwrap(), DataFormat::Jsonl);
        assert!("xml".parse::<DataFormat>().is_err());
    }

    #[test]
    fn test_csv_source_reads_named_columns() {
        let input = "extra,data_json,record_id\n\
                     x,\"{\"\"phone\"\":\"\"9876543210\"\"}\",1\n\
                     y,,2\n";

        let rows: Vec<RawRecord> = CsvSource::from_reader(input.as_bytes())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], RawRecord::new("1", r#"{"phone":"9876543210"}"#));
        assert_eq!(rows[1], RawRecord::new("2", ""));
    }

    #[test]
    fn test_csv_source_short_row() {
        let input = "record_id,data_json\n7\n";

        let rows: Vec<RawRecord> = CsvSource::from_reader(input.as_bytes())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(rows, vec![RawRecord::new("7", "")]);
    }

    #[test]
    fn test_csv_source_missing_column() {
        let input = "record_id,payload\n1,{}\n";

        let result = CsvSource::from_reader(input.as_bytes());
        assert!(matches!(result, Err(BatchError::MissingColumn(c)) if c == "data_json"));
    }

    #[test]
    fn test_jsonl_source() {
        let input = concat!(
            r#"{"record_id": "a", "data_json": "{\"name\":\"Asha\"}"}"#,
            "\n\n",
            r#"{"record_id": 42, "data_json": {"phone": "9876543210"}}"#,
            "\n",
            r#"{"record_id": "b"}"#,
            "\n"
        );

        let rows: Vec<RawRecord> = JsonlSource::from_reader(input.as_bytes())
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], RawRecord::new("a", r#"{"name":"Asha"}"#));
        assert_eq!(rows[1], RawRecord::new("42", r#"{"phone":"9876543210"}"#));
        assert_eq!(rows[2], RawRecord::new("b", ""));
    }

    #[test]
    fn test_jsonl_source_bad_line_reports_line_number() {
        let input = "{\"record_id\":\"a\",\"data_json\":\"{}\"}\nnot json\n{\"record_id\":\"c\"}\n";

        let rows: Vec<Result<RawRecord>> = JsonlSource::from_reader(input.as_bytes()).collect();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_ok());
        match &rows[1] {
            Err(BatchError::Row { line, .. }) => assert_eq!(*line, 2),
            other => panic!("expected row error, got {:?}", other),
        }
        assert!(rows[1].as_ref().unwrap_err().is_row_level());
        assert!(rows[2].is_ok());
    }

    #[test]
    fn test_jsonl_source_rejects_object_record_id() {
        let input = r#"{"record_id": {"x": 1}, "data_json": "{}"}"#;

        let rows: Vec<Result<RawRecord>> = JsonlSource::from_reader(input.as_bytes()).collect();
        assert!(matches!(rows[0], Err(BatchError::Row { line: 1, .. })));
    }
}

// ============================================================
// CSV PARSER
// ============================================================
// Parse CSV text into typed records with encoding fallback

use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::csv::{Header, Record, Value};
use crate::domain::error::{AppError, Result};

const DELIMITER: u8 = b',';

/// CSV parser producing one `Record` per data line
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvParser;

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self
    }

    /// Parse a CSV file and return its records
    pub fn parse_file(&self, path: &Path) -> Result<Vec<Record>> {
        let content = read_with_encoding_detection(path)?;
        self.parse_content(&content)
    }

    /// Parse CSV content from string. Pure: the same text always yields the same records.
    ///
    /// The header is the first line that is not blank; whitespace-only lines are skipped.
    pub fn parse_content(&self, content: &str) -> Result<Vec<Record>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .trim(Trim::None)
            .flexible(true) // Short rows are padded below
            .from_reader(content.as_bytes());

        let mut header: Option<Arc<Header>> = None;
        let mut records = Vec::new();
        for result in reader.records() {
            let row = result.map_err(|e| {
                AppError::ParseError(format!(
                    "Failed to parse CSV row {}: {}",
                    records.len() + 1,
                    e
                ))
            })?;

            let Some(current) = &header else {
                if !row.iter().all(|h| h.trim().is_empty()) {
                    header = Some(Arc::new(Header::new(
                        row.iter().map(|h| h.trim().to_string()).collect(),
                    )?));
                }
                continue;
            };

            if is_blank_line(&row) {
                debug!(line = line_of(&row), "Skipping whitespace-only CSV line");
                continue;
            }

            records.push(self.parse_row(current, &row)?);
        }

        let header = header.ok_or_else(|| {
            AppError::ParseError("CSV content has no header row".to_string())
        })?;

        debug!(
            "Parsed {} records with {} columns",
            records.len(),
            header.len()
        );
        Ok(records)
    }

    /// Type every cell of one row, padding or truncating it to the header width
    fn parse_row(&self, header: &Arc<Header>, row: &StringRecord) -> Result<Record> {
        let line = line_of(row);

        if row.len() < header.len() {
            warn!(
                line,
                expected = header.len(),
                actual = row.len(),
                "CSV row has fewer fields than the header; padding with absent values"
            );
        } else if row.len() > header.len() {
            warn!(
                line,
                expected = header.len(),
                actual = row.len(),
                "CSV row has more fields than the header; dropping extra fields"
            );
        }

        let values = (0..header.len())
            .map(|idx| row.get(idx).map(Value::from_raw).unwrap_or(Value::Absent))
            .collect();

        Record::new(Arc::clone(header), values)
    }
}

fn line_of(row: &StringRecord) -> u64 {
    row.position().map(|p| p.line()).unwrap_or_default()
}

/// A single field of nothing but whitespace; rows with delimiters are real rows of absent cells
fn is_blank_line(row: &StringRecord) -> bool {
    row.len() == 1 && row.iter().all(|field| field.trim().is_empty())
}

/// Read file as UTF-8, falling back to Windows-1252 for legacy exports
fn read_with_encoding_detection(path: &Path) -> Result<String> {
    let buffer = std::fs::read(path).map_err(|e| {
        AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
    })?;

    match String::from_utf8(buffer) {
        Ok(content) => Ok(content),
        Err(err) => {
            warn!(path = %path.display(), "CSV file is not valid UTF-8; decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(err.as_bytes());
            Ok(decoded.into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let content = "PassengerId,Age,Sex\n1,22,male\n2,38,female";
        let records = CsvParser::new().parse_content(content).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].columns(), &["PassengerId", "Age", "Sex"]);
        assert_eq!(records[0].get("Age"), &Value::Number(22.0));
        assert_eq!(records[1].get("Sex"), &Value::text("female"));
    }

    #[test]
    fn test_quoted_fields_keep_commas_and_quotes() {
        let content = "Name,Age\n\"Braund, Mr. Owen \"\"Harris\"\"\",22";
        let records = CsvParser::new().parse_content(content).unwrap();

        assert_eq!(
            records[0].get("Name"),
            &Value::text("Braund, Mr. Owen \"Harris\"")
        );
        assert_eq!(records[0].get("Age"), &Value::Number(22.0));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let content = "A,B,C\n1,2\n4,5,6";
        let records = CsvParser::new().parse_content(content).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("B"), &Value::Number(2.0));
        assert_eq!(records[0].get("C"), &Value::Absent);
        assert_eq!(records[1].get("C"), &Value::Number(6.0));
    }

    #[test]
    fn test_long_rows_are_truncated() {
        let records = CsvParser::new().parse_content("A,B\n1,2,3").unwrap();
        assert_eq!(records[0].values().len(), 2);
    }

    #[test]
    fn test_empty_cells_and_blank_lines() {
        let content = "\nAge,Cabin\n\n,C85\n  ,\n";
        let records = CsvParser::new().parse_content(content).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Age"), &Value::Absent);
        assert_eq!(records[0].get("Cabin"), &Value::text("C85"));
        assert_eq!(records[1].get("Age"), &Value::Absent);
        assert_eq!(records[1].get("Cabin"), &Value::Absent);
    }

    #[test]
    fn test_trailing_whitespace_line_is_skipped() {
        let records = CsvParser::new()
            .parse_content("Age,Survived\n22,1\n   \n")
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Age"), &Value::Number(22.0));
    }

    #[test]
    fn test_whitespace_line_before_header() {
        let records = CsvParser::new()
            .parse_content("   \nAge,Survived\n22,1\n")
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].columns(), &["Age", "Survived"]);
        assert_eq!(records[0].get("Age"), &Value::Number(22.0));
    }

    #[test]
    fn test_whitespace_only_content_has_no_header() {
        let result = CsvParser::new().parse_content("  \n\t\n");
        assert!(matches!(result, Err(AppError::ParseError(_))));
    }

    #[test]
    fn test_duplicate_header_is_parse_error() {
        let result = CsvParser::new().parse_content("Age,Age\n1,2");
        assert!(matches!(result, Err(AppError::ParseError(_))));
    }

    #[test]
    fn test_parse_is_repeatable() {
        let content = "Age,Fare\n22,7.25\n,71.2833";
        let parser = CsvParser::new();
        assert_eq!(
            parser.parse_content(content).unwrap(),
            parser.parse_content(content).unwrap()
        );
    }

    #[test]
    fn test_round_trip_from_known_records() {
        let originals = vec![
            Record::from_pairs([
                ("Name", Value::text("Heikkinen, Miss. Laina")),
                ("Age", Value::Number(26.0)),
                ("Fare", Value::Number(7.925)),
            ])
            .unwrap(),
            Record::from_pairs([
                ("Name", Value::text("Allen, Mr. William \"Bill\"")),
                ("Age", Value::Absent),
                ("Fare", Value::Number(8.05)),
            ])
            .unwrap(),
        ];

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(originals[0].columns()).unwrap();
        for record in &originals {
            writer
                .write_record(record.values().iter().map(|v| v.to_string()))
                .unwrap();
        }
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        let parsed = CsvParser::new().parse_content(&text).unwrap();
        assert_eq!(parsed.len(), originals.len());
        for (parsed, original) in parsed.iter().zip(&originals) {
            assert_eq!(parsed.values(), original.values());
        }
    }

    #[test]
    fn test_parse_missing_file_is_io_error() {
        let path = std::env::temp_dir().join(format!("missing-{}.csv", uuid::Uuid::new_v4()));
        let result = CsvParser::new().parse_file(&path);
        assert!(matches!(result, Err(AppError::IoError(_))));
    }

    #[test]
    fn test_parse_latin1_file() {
        let path = std::env::temp_dir().join(format!("latin1-{}.csv", uuid::Uuid::new_v4()));
        // "Name\nJos\xe9" in Windows-1252
        std::fs::write(&path, b"Name\nJos\xe9\n").unwrap();

        let records = CsvParser::new().parse_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records[0].get("Name"), &Value::text("Jos\u{e9}"));
    }
}

//! Import payload parsing.
//!
//! Bulk imports arrive as a JSON array of `{"submission", "video_id"}` objects
//! or as a CSV table with `submission` and `video_id` header columns. This
//! module only turns bytes into records; validating the records against the
//! schedule happens in the API service layer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const SUBMISSION_COLUMN: &str = "submission";
const VIDEO_ID_COLUMN: &str = "video_id";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One (talk reference, raw video value) pair, in payload order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportRecord {
    /// Public talk code, e.g. `ABC123`
    pub submission: String,
    /// URL or bare identifier; normalised during import
    pub video_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

/// What to do when neither content type nor file name names a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatDetection {
    /// Guess from the payload: a leading `[` means JSON, anything else CSV.
    Sniff,
    /// Refuse the payload.
    Declared,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("Unsupported file type; upload a .json or .csv file")]
    UnsupportedFormat,

    #[error("Invalid JSON: {0}")]
    Json(String),

    #[error("Invalid CSV: {0}")]
    Csv(String),

    #[error("CSV header is missing the '{0}' column")]
    MissingColumn(&'static str),

    #[error("The file contains no records")]
    Empty,
}

fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// Decide how to read a payload.
pub fn detect_format(
    content_type: Option<&str>,
    filename: Option<&str>,
    body: &[u8],
    detection: FormatDetection,
) -> Result<ImportFormat, ImportError> {
    if let Some(content_type) = content_type {
        let mime = normalize_mime_type(content_type);
        if mime == "application/json" || mime.ends_with("+json") {
            return Ok(ImportFormat::Json);
        }
        if mime == "text/csv" || mime == "application/csv" {
            return Ok(ImportFormat::Csv);
        }
    }

    if let Some(filename) = filename {
        let extension = filename.rsplit_once('.').map(|(_, ext)| ext.to_lowercase());
        match extension.as_deref() {
            Some("json") => return Ok(ImportFormat::Json),
            Some("csv") => return Ok(ImportFormat::Csv),
            _ => {}
        }
    }

    match detection {
        FormatDetection::Declared => Err(ImportError::UnsupportedFormat),
        FormatDetection::Sniff => {
            let first = strip_bom(body)
                .iter()
                .find(|b| !b.is_ascii_whitespace())
                .copied();
            Ok(match first {
                Some(b'[') => ImportFormat::Json,
                _ => ImportFormat::Csv,
            })
        }
    }
}

/// Parse an import payload into records.
pub fn parse_import_payload(
    body: &[u8],
    content_type: Option<&str>,
    filename: Option<&str>,
    detection: FormatDetection,
) -> Result<Vec<ImportRecord>, ImportError> {
    let records = match detect_format(content_type, filename, body, detection)? {
        ImportFormat::Json => parse_json(body)?,
        ImportFormat::Csv => parse_csv(body)?,
    };
    if records.is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(records)
}

fn strip_bom(body: &[u8]) -> &[u8] {
    body.strip_prefix(UTF8_BOM).unwrap_or(body)
}

fn parse_json(body: &[u8]) -> Result<Vec<ImportRecord>, ImportError> {
    serde_json::from_slice(strip_bom(body)).map_err(|e| ImportError::Json(e.to_string()))
}

fn parse_csv(body: &[u8]) -> Result<Vec<ImportRecord>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(strip_bom(body));

    let headers = reader
        .headers()
        .map_err(|e| ImportError::Csv(e.to_string()))?
        .clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(ImportError::MissingColumn(name))
    };
    let submission_idx = column(SUBMISSION_COLUMN)?;
    let video_id_idx = column(VIDEO_ID_COLUMN)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| ImportError::Csv(e.to_string()))?;
        if row.iter().all(|field| field.is_empty()) {
            continue;
        }
        records.push(ImportRecord {
            submission: row.get(submission_idx).unwrap_or_default().to_string(),
            video_id: row.get(video_id_idx).unwrap_or_default().to_string(),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(submission: &str, video_id: &str) -> ImportRecord {
        ImportRecord {
            submission: submission.to_string(),
            video_id: video_id.to_string(),
        }
    }

    #[test]
    fn test_json_array() {
        let body = br#"[{"submission": "ABC123", "video_id": "dQw4w9WgXcQ", "title": "ignored"}]"#;
        let records =
            parse_import_payload(body, Some("application/json"), None, FormatDetection::Sniff)
                .unwrap();
        assert_eq!(records, vec![record("ABC123", "dQw4w9WgXcQ")]);
    }

    #[test]
    fn test_json_must_be_array_of_records() {
        let body = br#"{"submission": "ABC123", "video_id": "x"}"#;
        let err = parse_import_payload(body, Some("application/json"), None, FormatDetection::Sniff)
            .unwrap_err();
        assert!(matches!(err, ImportError::Json(_)));

        let body = br#"[{"submission": "ABC123"}]"#;
        assert!(matches!(
            parse_import_payload(body, None, Some("links.json"), FormatDetection::Declared),
            Err(ImportError::Json(_))
        ));
    }

    #[test]
    fn test_csv_with_blank_rows() {
        let body = b"submission,video_id\nABC123,https://youtu.be/xyz\n,\n  ,  \nDEF456,abc\n";
        let records =
            parse_import_payload(body, Some("text/csv"), None, FormatDetection::Declared).unwrap();
        assert_eq!(
            records,
            vec![
                record("ABC123", "https://youtu.be/xyz"),
                record("DEF456", "abc")
            ]
        );
    }

    #[test]
    fn test_csv_column_order_and_bom() {
        let body = b"\xEF\xBB\xBFvideo_id,title,submission\nxyz,Keynote,ABC123\n";
        let records =
            parse_import_payload(body, None, Some("export.CSV"), FormatDetection::Declared)
                .unwrap();
        assert_eq!(records, vec![record("ABC123", "xyz")]);
    }

    #[test]
    fn test_payload_without_records() {
        assert_eq!(
            parse_import_payload(b"[]", Some("application/json"), None, FormatDetection::Sniff),
            Err(ImportError::Empty)
        );
        assert_eq!(
            parse_import_payload(
                b"submission,video_id\n,\n",
                None,
                Some("links.csv"),
                FormatDetection::Declared
            ),
            Err(ImportError::Empty)
        );
    }

    #[test]
    fn test_csv_missing_column() {
        let body = b"code,video\nABC123,xyz\n";
        assert_eq!(
            parse_import_payload(body, Some("text/csv"), None, FormatDetection::Declared),
            Err(ImportError::MissingColumn("submission"))
        );
    }

    #[test]
    fn test_declared_rejects_unknown_type() {
        assert_eq!(
            parse_import_payload(
                b"hello",
                Some("text/plain"),
                Some("notes.txt"),
                FormatDetection::Declared
            ),
            Err(ImportError::UnsupportedFormat)
        );
    }

    #[test]
    fn test_sniffing() {
        assert_eq!(
            detect_format(None, None, b"  [{}]", FormatDetection::Sniff),
            Ok(ImportFormat::Json)
        );
        assert_eq!(
            detect_format(
                Some("application/octet-stream"),
                None,
                b"submission,video_id",
                FormatDetection::Sniff
            ),
            Ok(ImportFormat::Csv)
        );
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        assert_eq!(
            detect_format(
                Some("Text/CSV; charset=utf-8"),
                None,
                b"",
                FormatDetection::Declared
            ),
            Ok(ImportFormat::Csv)
        );
    }
}

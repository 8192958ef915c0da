/// CSV codec for bulk page exchange
use crate::domain::aggregates::Page;
use crate::infrastructure::markup::strip_markup;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use serde::Deserialize;
use thiserror::Error;

/// Header written on export. Import expects `pageName,title,content` instead.
pub const EXPORT_HEADER: &str = "Page Name,Title,Content";

#[derive(Error, Debug)]
pub enum CsvCodecError {
    #[error("Malformed CSV: {message}")]
    Malformed { line: Option<u64>, message: String },

    #[error("Failed to write CSV: {0}")]
    Write(String),
}

impl From<csv::Error> for CsvCodecError {
    fn from(err: csv::Error) -> Self {
        CsvCodecError::Malformed {
            line: err.position().map(|pos| pos.line()),
            message: err.to_string(),
        }
    }
}

/// One data row as it appeared in the upload, before validation.
///
/// A field is `None` when its column is absent or the cell is empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CsvPageRow {
    #[serde(skip)]
    pub line: u64,
    #[serde(rename = "pageName")]
    pub page_name: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Parse CSV text with a header row into raw page rows.
///
/// Blank lines are skipped. A record whose field count differs from the
/// header, an unterminated quoted field, or text after a closing quote is a
/// structural error and fails the whole parse.
pub fn parse_page_rows(raw: &str) -> Result<Vec<CsvPageRow>, CsvCodecError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    check_quoting(raw)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(raw.as_bytes());

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    let mut record = StringRecord::new();

    while reader.read_record(&mut record)? {
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let mut row: CsvPageRow = record.deserialize(Some(&headers))?;
        row.line = line;
        rows.push(row);
    }

    Ok(rows)
}

#[derive(Clone, Copy)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted { opened_on: u64 },
    AfterQuote,
}

/// Reject quoting the `csv` reader would otherwise tolerate: a quoted field
/// must close before EOF, and its closing quote must be followed by a
/// delimiter, a line break or EOF.
fn check_quoting(raw: &str) -> Result<(), CsvCodecError> {
    let mut line: u64 = 1;
    let mut state = QuoteState::FieldStart;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        state = match (state, c) {
            (QuoteState::Quoted { opened_on }, '"') => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    QuoteState::Quoted { opened_on }
                } else {
                    QuoteState::AfterQuote
                }
            }
            (QuoteState::Quoted { .. }, _) => state,
            (QuoteState::FieldStart, '"') => QuoteState::Quoted { opened_on: line },
            (_, ',' | '\n' | '\r') => QuoteState::FieldStart,
            (QuoteState::AfterQuote, ' ' | '\t') => QuoteState::AfterQuote,
            (QuoteState::AfterQuote, _) => {
                return Err(CsvCodecError::Malformed {
                    line: Some(line),
                    message: "Trailing quote on quoted field is malformed".to_string(),
                });
            }
            _ => QuoteState::Unquoted,
        };
        if c == '\n' {
            line += 1;
        }
    }

    if let QuoteState::Quoted { opened_on } = state {
        return Err(CsvCodecError::Malformed {
            line: Some(opened_on),
            message: "Quoted field unterminated".to_string(),
        });
    }
    Ok(())
}

/// Serialize pages to CSV text for download.
///
/// Content is flattened to plain text, every field is quoted, and rows are
/// newline-separated with no trailing newline.
pub fn write_pages_csv(pages: &[Page]) -> Result<String, CsvCodecError> {
    let mut out = Vec::with_capacity(64 * (pages.len() + 1));
    out.extend_from_slice(EXPORT_HEADER.as_bytes());
    out.push(b'\n');

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    for page in pages {
        let plain = strip_markup(page.content().as_str());
        writer
            .write_record([page.page_name().as_str(), page.title().as_str(), plain.as_str()])
            .map_err(|e| CsvCodecError::Write(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CsvCodecError::Write(e.to_string()))?;
    let mut text = String::from_utf8(bytes).map_err(|e| CsvCodecError::Write(e.to_string()))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

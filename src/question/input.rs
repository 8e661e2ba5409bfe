//! Loaders for exported question files.

use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, instrument};

use super::error::InputError;
use super::{QuestionLabel, QuestionRecord};

/// Field separator used by the delimited export format.
const FIELD_SEPARATOR: &str = " --- ";

/// On-disk layout of a question file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Pick by extension: `.json` is JSON, anything else is delimited text.
    #[default]
    Auto,
    /// One `text --- YYYY-MM-DD --- code` record per line.
    Delimited,
    /// An array of `{text, date, label}` objects.
    Json,
}

impl InputFormat {
    /// Resolves `Auto` against a concrete path.
    #[must_use]
    pub fn resolve(self, path: &Path) -> Self {
        match self {
            Self::Auto => {
                let is_json = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
                if is_json { Self::Json } else { Self::Delimited }
            }
            other => other,
        }
    }
}

/// Reads and parses a question file.
///
/// # Errors
///
/// Returns [`InputError::Io`] if the file cannot be read, or a parse error
/// for the resolved format.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn load_questions(path: &Path, format: InputFormat) -> Result<Vec<QuestionRecord>, InputError> {
    let raw = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = match format.resolve(path) {
        InputFormat::Json => parse_json(&raw)?,
        InputFormat::Delimited | InputFormat::Auto => parse_delimited(&raw)?,
    };
    debug!(records = records.len(), "Loaded question file");
    Ok(records)
}

/// Parses the delimited export format.
///
/// Blank lines are skipped. The text field may itself contain the separator;
/// date and code are always taken from the end of the line.
///
/// # Errors
///
/// Returns [`InputError::MalformedLine`] naming the first bad line.
pub fn parse_delimited(raw: &str) -> Result<Vec<QuestionRecord>, InputError> {
    let mut records = Vec::new();
    for (index, line) in raw.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.rsplitn(3, FIELD_SEPARATOR);
        let (Some(code), Some(date), Some(text)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(InputError::malformed(
                line_no,
                "expected 3 fields separated by ' --- '",
            ));
        };

        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|err| {
            InputError::malformed(line_no, format!("invalid date '{}': {err}", date.trim()))
        })?;
        let code = code.trim().parse::<i64>().map_err(|_| {
            InputError::malformed(line_no, format!("invalid label code '{}'", code.trim()))
        })?;

        records.push(QuestionRecord::new(text, date, QuestionLabel::from_code(code)));
    }
    Ok(records)
}

/// Parses a JSON array of question records.
///
/// # Errors
///
/// Returns [`InputError::Json`] when the document does not match.
pub fn parse_json(raw: &str) -> Result<Vec<QuestionRecord>, InputError> {
    Ok(serde_json::from_str(raw)?)
}

use chrono::{Datelike, NaiveDate};
use thiserror::Error as ThisError;

/// Wire format for every date the service reads or writes.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shape-validation failures raised before a request reaches a handler.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("date_of_birth must be in 'YYYY-MM-DD' format")]
    DateFormat { input: String },

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

impl ValidationError {
    /// Offending input text, for logs only.
    pub fn input(&self) -> &str {
        match self {
            ValidationError::DateFormat { input } => input,
            ValidationError::EmptyField { field } => field,
        }
    }
}

/// Parse strict `YYYY-MM-DD` text into a calendar date.
///
/// chrono alone accepts short fields (`1998-6-12`) and signed years, so the
/// layout is checked byte by byte before the calendar check.
pub fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    let bytes = text.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_shaped {
        return Err(ValidationError::DateFormat {
            input: text.to_string(),
        });
    }

    // Year 0000 is not a valid calendar year on the wire.
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .filter(|date| date.year() >= 1)
        .ok_or_else(|| ValidationError::DateFormat {
            input: text.to_string(),
        })
}

/// Render a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

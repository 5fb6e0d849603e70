//! Error type for the fallible edges of the crate.
//!
//! Transforms on [`TimeSeries`](crate::TimeSeries) are total and never fail.
//! Only conversion from raw epoch seconds and the CSV codec return
//! [`Result`], because a malformed row means corrupt input rather than a
//! sparse-data gap.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building series from raw input or reading/writing CSV.
#[derive(Error, Debug)]
pub enum Error {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("line {line}: expected {expected} fields, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: unparseable timestamp {value:?}")]
    InvalidTimestamp { line: u64, value: String },

    #[error("line {line}: column {column:?} has unparseable value {value:?}")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },

    #[error("epoch seconds out of range: {0}")]
    TimestampOutOfRange(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_line_numbers() {
        let err = Error::ColumnCount {
            line: 4,
            expected: 3,
            found: 2,
        };
        assert_eq!(err.to_string(), "line 4: expected 3 fields, found 2");

        let err = Error::InvalidTimestamp {
            line: 2,
            value: "yesterday".to_string(),
        };
        assert_eq!(err.to_string(), "line 2: unparseable timestamp \"yesterday\"");
    }
}

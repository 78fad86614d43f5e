//! Error types for ledgrid.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgridError {
    #[error("not a PDF document: missing %PDF signature")]
    NotPdf,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("normalizer `{program}` failed ({status}): {stderr}")]
    Normalizer {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("invalid pattern for token kind {kind}: {source}")]
    InvalidPattern {
        kind: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown token kind: {0}")]
    UnknownTokenKind(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("statement date range not found")]
    MissingStatementRange,

    #[error("no valid date for {month:02}/{day:02} in statement range")]
    UnresolvableDate { month: u32, day: u32 },

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

pub type Result<T> = std::result::Result<T, LedgridError>;

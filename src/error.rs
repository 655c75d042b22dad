use std::convert::Infallible;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidInput(String),

    #[error("'{value}' is not a valid {kind}")]
    InvalidEnum { kind: &'static str, value: String },

    #[error("Unexpected response from the OCR service: {0}")]
    Decoding(#[from] DecodeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub(crate) fn invalid_enum(kind: &'static str, value: &str) -> Self {
        Self::InvalidEnum {
            kind,
            value: value.to_owned(),
        }
    }
}

// Lets `language(Language::English)` share a bound with `language("eng")`.
impl From<Infallible> for Error {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

/// A required response field was absent or held a value outside its enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` should be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown OCRExitCode {0}")]
    UnknownOcrExitCode(i64),

    #[error("unknown FileParseExitCode {0}")]
    UnknownFileParseExitCode(i64),
}

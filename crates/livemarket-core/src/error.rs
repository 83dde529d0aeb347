use thiserror::Error;

/// Validation and contract errors exposed by `livemarket-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid period '{value}', expected one of 1D, 1S, 1M, 3M, 6M, 1Y, 5Y, ALL")]
    InvalidPeriod { value: String },
    #[error("year range start {start_year} is after end {end_year}")]
    InvertedYearRange { start_year: i32, end_year: i32 },

    #[error("chart point {index} is older than its predecessor ({ts} < {previous})")]
    UnorderedChart { index: usize, ts: i64, previous: i64 },

    #[error("origin must be an absolute http(s) URL: '{value}'")]
    InvalidOrigin { value: String },
}

/// Failure of a single remote fetch, as stored in a result cell.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The transport itself failed (DNS, connection, timeout, body read).
    #[error("network failure: {message}")]
    Network { message: String },
    /// The server answered with a status outside the 2xx range.
    #[error("Error: {status} {status_text}")]
    HttpStatus { status: u16, status_text: String },
    /// The body was not valid JSON, did not match the expected shape, or failed validation.
    #[error("parse failure: {message}")]
    Parse { message: String },
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn http_status(status: u16, status_text: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            status_text: status_text.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Network { .. } => "fetch.network",
            Self::HttpStatus { .. } => "fetch.http_status",
            Self::Parse { .. } => "fetch.parse",
        }
    }

    /// HTTP status carried by the error, if any.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ValidationError> for FetchError {
    fn from(value: ValidationError) -> Self {
        Self::parse(value.to_string())
    }
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("an immediate fetch requires a running Tokio runtime")]
    RuntimeUnavailable,
}

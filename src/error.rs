/// Error types for collection views
use std::fmt;

#[derive(Debug, Clone)]
pub enum ViewError {
    // Query errors
    InvalidQuery { query: String, details: String },
    InvalidRegex { pattern: String, source: regex::Error },

    // Criteria errors
    InvalidTimestamp { value: String },
    UnknownDimension { dimension: String },
    UnknownSortKey { key: String },

    // Source errors
    Parse { details: String },
}

pub type ViewResult<T> = Result<T, ViewError>;

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::InvalidQuery { query, details } => {
                write!(f, "Invalid query syntax: {query} - {details}")
            }
            ViewError::InvalidRegex { pattern, source } => {
                write!(f, "Invalid regex /{pattern}/: {source}")
            }
            ViewError::InvalidTimestamp { value } => {
                write!(f, "Unrecognised date/time: {value}")
            }
            ViewError::UnknownDimension { dimension } => {
                write!(f, "Unknown filter dimension: {dimension}")
            }
            ViewError::UnknownSortKey { key } => write!(f, "Unknown sort key: {key}"),
            ViewError::Parse { details } => write!(f, "Parse error: {details}"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewError::InvalidRegex { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ViewError {
    fn from(err: serde_json::Error) -> Self {
        ViewError::Parse {
            details: err.to_string(),
        }
    }
}

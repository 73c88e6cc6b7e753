use std::fmt;

/// Result type for abaca-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// A view configuration references unknown fields or is otherwise unusable
    InvalidConfig(String),

    /// Caller supplied a value the model cannot represent (bad filter value, list shape, ...)
    InvalidInput(String),

    /// JSON decoding failed
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid view config: {}", msg),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Error::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            Error::InvalidConfig(_) | Error::InvalidInput(_) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

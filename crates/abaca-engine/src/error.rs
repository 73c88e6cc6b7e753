use std::fmt;

/// Result type for abaca-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the engine layer.
///
/// The pipeline itself is infallible; these only arise from exporting.
#[derive(Debug)]
pub enum Error {
    /// Types layer error
    Types(abaca_types::Error),

    /// CSV writer failed
    Csv(csv::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// JSON serialization failed
    Json(serde_json::Error),

    /// Output was not valid UTF-8
    Encoding(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Types(err) => write!(f, "{}", err),
            Error::Csv(err) => write!(f, "CSV error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::Encoding(msg) => write!(f, "Encoding error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Types(err) => Some(err),
            Error::Csv(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Encoding(_) => None,
        }
    }
}

impl From<abaca_types::Error> for Error {
    fn from(err: abaca_types::Error) -> Self {
        Error::Types(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

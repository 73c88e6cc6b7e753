use std::fmt;

/// Result type for abaca-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Types layer error (bad list shape, invalid view config or filter value)
    Types(abaca_types::Error),

    /// Engine layer error (export)
    Engine(abaca_engine::Error),

    /// HTTP transport failed
    Http(reqwest::Error),

    /// Backend answered with a non-success status
    Status { status: u16, body: String },

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Invalid operation or state
    InvalidOperation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Types(err) => write!(f, "{}", err),
            Error::Engine(err) => write!(f, "Engine error: {}", err),
            Error::Http(err) => write!(f, "HTTP error: {}", err),
            Error::Status { status, body } => {
                if body.is_empty() {
                    write!(f, "Server responded with status {}", status)
                } else {
                    write!(f, "Server responded with status {}: {}", status, body)
                }
            }
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Types(err) => Some(err),
            Error::Engine(err) => Some(err),
            Error::Http(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Status { .. } | Error::Config(_) | Error::InvalidOperation(_) => None,
        }
    }
}

impl From<abaca_types::Error> for Error {
    fn from(err: abaca_types::Error) -> Self {
        Error::Types(err)
    }
}

impl From<abaca_engine::Error> for Error {
    fn from(err: abaca_engine::Error) -> Self {
        Error::Engine(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Types(abaca_types::Error::Json(err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

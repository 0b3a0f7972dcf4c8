//! Unified error type for all store operations.

/// Things that can go wrong when using the store.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// File system problem (read, write, rename).
    Io(String),
    /// Failed to serialize the document to bytes.
    Serialize(String),
    /// Persisted bytes are not a valid document.
    Deserialize(String),
    /// Bad configuration (empty path, unparsable setting, etc.).
    Config(String),
    /// A mutation request was rejected before touching the store: unparsable
    /// body, unknown category, or an entry that isn't an object.
    InvalidRequest(String),
}

impl Error {
    /// `true` when the caller sent bad input, as opposed to the server failing.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidRequest(_))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Error::Deserialize(msg) => write!(f, "corrupt document: {msg}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() || err.is_data() {
            Error::Deserialize(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

impl From<crate::merge::PayloadError> for Error {
    fn from(err: crate::merge::PayloadError) -> Self {
        Error::InvalidRequest(err.to_string())
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

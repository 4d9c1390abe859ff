use std::{fmt, io, num::ParseFloatError};

/// What went wrong, coarsely. Per-element failures during drawing are
/// collected and reported; everything else aborts the current jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A response was missing expected fields or had an unexpected shape.
    DataShape,
    /// Out-of-range or degenerate input (bad lat/lon, ring with <2 points).
    Validation,
    /// An operation that needs a valid bounding box ran before one was set.
    NotReady,
    /// An element kind other than way/relation reached rendering.
    UnsupportedElement,
    Network,
    Io,
    Other,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Error {
        Error {
            kind,
            message: message.into(),
        }
    }

    pub fn data_shape(message: impl Into<String>) -> Error {
        Error::new(ErrorKind::DataShape, message)
    }

    pub fn validation(message: impl Into<String>) -> Error {
        Error::new(ErrorKind::Validation, message)
    }

    pub fn not_ready(message: impl Into<String>) -> Error {
        Error::new(ErrorKind::NotReady, message)
    }

    pub fn unsupported_element(message: impl Into<String>) -> Error {
        Error::new(ErrorKind::UnsupportedElement, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::new(ErrorKind::Io, value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::new(ErrorKind::DataShape, value.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::new(ErrorKind::Network, value.to_string())
    }
}

impl From<ParseFloatError> for Error {
    fn from(value: ParseFloatError) -> Self {
        Error::new(ErrorKind::Validation, value.to_string())
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::new(ErrorKind::Other, value)
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::new(ErrorKind::Other, value)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

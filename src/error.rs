//! Error types for the device inventory

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
///
/// Callers that only need to decide between "try again later" and
/// "fix the request" should match on this instead of the full error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The external inventory source could not be listed
    RemoteUnavailable,
    /// A caller-supplied argument violated a precondition
    InvalidArgument,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::RemoteUnavailable => write!(f, "RemoteUnavailable"),
            ErrorKind::InvalidArgument => write!(f, "InvalidArgument"),
        }
    }
}

/// Errors that can occur while enumerating devices
#[derive(Error, Debug)]
pub enum Error {
    /// Listing published device groups failed
    #[error("Remote inventory unavailable: {0}")]
    RemoteUnavailable(#[source] kube::Error),

    /// Invalid argument or precondition
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Build an `InvalidArgument` error from anything printable.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Get the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RemoteUnavailable(_) => ErrorKind::RemoteUnavailable,
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }
}

impl From<kube::Error> for Error {
    fn from(e: kube::Error) -> Self {
        Error::RemoteUnavailable(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::InvalidArgument(format!("malformed configuration: {}", e))
    }
}

//! Errors returned by tracking and replay

use serde::{Deserialize, Serialize};
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or missing input to `track`, `get_actions` or `play`
    #[error("{0}")]
    InvalidArgument(String),

    /// The tracker has no member of that name and kind
    #[error("'{key}' is not a {expected} member of the tracked object")]
    MemberMismatch { key: String, expected: MemberKind },

    /// An invocation targeted a member whose current value is not callable
    #[error("'{0}' is not callable")]
    NotCallable(String),

    /// The object is already borrowed further up the current call stack
    #[error("object is already borrowed")]
    Borrowed,

    /// Failure raised by the object's own assignment or method
    #[error(transparent)]
    Forwarded(anyhow::Error),
}

/// Errors that crossed an `anyhow` boundary keep their own code: a tracker
/// driven through [`Trackable`](crate::Trackable) reports its own failures,
/// not a forwarded one.
impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        match e.downcast::<Error>() {
            Ok(inner) => inner,
            Err(e) => Error::Forwarded(e),
        }
    }
}

/// How a member is exposed by a tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Data,
    Callable,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Data => write!(f, "data"),
            MemberKind::Callable => write!(f, "callable"),
        }
    }
}

/// Stable error codes for structured output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidArgument,
    MemberMismatch,
    NotCallable,
    Borrowed,
    Forwarded,
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn member_mismatch(key: &str, expected: MemberKind) -> Self {
        Self::MemberMismatch {
            key: key.to_string(),
            expected,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Error::MemberMismatch { .. } => ErrorCode::MemberMismatch,
            Error::NotCallable(_) => ErrorCode::NotCallable,
            Error::Borrowed => ErrorCode::Borrowed,
            Error::Forwarded(_) => ErrorCode::Forwarded,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

/// Serializable view of an [`Error`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&Error> for ErrorReport {
    fn from(e: &Error) -> Self {
        Self {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

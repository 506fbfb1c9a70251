use std::error::Error as StdError;
use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request could not be sent, or the response could not be read.
    Transport,
    /// The provider answered with a non-success HTTP status.
    Status,
    /// The provider answered with a body that is not valid JSON.
    InvalidPayload,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "Transport error"),
            ErrorKind::Status => write!(f, "Unexpected status"),
            ErrorKind::InvalidPayload => write!(f, "Invalid payload"),
        }
    }
}

/// Error type for searches.
///
/// Provider-side rejections (a response carrying an `error` key) are not
/// errors: the search degrades to an empty result instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchError {
    kind: ErrorKind,
    status: Option<u16>,
    message: String,
}

impl SearchError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transport,
            status: None,
            message: message.into(),
        }
    }

    pub(crate) fn status(status: u16, body: &str) -> Self {
        Self {
            kind: ErrorKind::Status,
            status: Some(status),
            message: format!(
                "Received status code {status} with response: {body}"
            ),
        }
    }

    pub(crate) fn invalid_payload(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidPayload,
            status: None,
            message: message.into(),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the HTTP status code, if the provider answered at all.
    #[inline]
    pub fn status_code(&self) -> Option<u16> {
        self.status
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for SearchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = SearchError::status(429, "slow down");
        assert_eq!(err.kind(), ErrorKind::Status);
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(
            err.to_string(),
            "Received status code 429 with response: slow down"
        );
    }
}

//! Error type for Vanish API operations.

use std::error::Error as _;
use thiserror::Error;

/// Errors returned by [`Client`](crate::Client) operations.
///
/// Every variant carries a human-readable message; only [`Error::Api`] carries
/// an HTTP status code.
#[derive(Debug, Error)]
pub enum Error {
    /// The server answered with a non-2xx status.
    ///
    /// `message` is the `error` field of the JSON body when present,
    /// otherwise a generic status description.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a response (DNS failure, refused
    /// connection, timeout expiry, broken body stream).
    ///
    /// `message` includes every underlying cause, e.g. the refused connection.
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// A successful response body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The configured base URL is not an absolute URL.
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The API key or user agent could not be encoded as a header value.
    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),
}

impl Error {
    /// HTTP status code, present only for [`Error::Api`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable description of the failure.
    pub fn message(&self) -> String {
        match self {
            Error::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether this error came from a non-2xx response with the given status.
    pub fn is_status(&self, code: u16) -> bool {
        self.status_code() == Some(code)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut cause = err.source();
        while let Some(inner) = cause {
            let text = inner.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            cause = inner.source();
        }

        Error::Connection {
            message,
            source: err,
        }
    }
}

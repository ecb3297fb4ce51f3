//! Error types for the bug service client.
//!
//! Non-2xx responses are collapsed into `RequestFailed` with a fixed message
//! per operation; the server's error body is not inspected.

use std::fmt;

/// Errors returned by `BugClient` calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The server answered with a non-success status.
    RequestFailed(&'static str),

    /// The request never produced a response (connection refused, reset, ...).
    Transport(String),

    /// A success response whose body did not match the expected envelope.
    Decode(String),

    /// The base URL cannot carry a bug id path segment.
    InvalidUrl(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::RequestFailed(msg) => f.write_str(msg),
            ClientError::Transport(msg) => write!(f, "network error: {msg}"),
            ClientError::Decode(msg) => write!(f, "invalid response body: {msg}"),
            ClientError::InvalidUrl(msg) => write!(f, "invalid URL: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

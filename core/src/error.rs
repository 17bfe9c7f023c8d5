//! Error types for the bit.ly client.
//!
//! # Design
//! Three failure classes are kept apart because callers react to them
//! differently:
//! - `Transport`: the round-trip itself failed or the body was not an
//!   envelope at all.
//! - `Service`: the envelope reported a non-200 `status_code`. The code and
//!   `status_txt` are carried verbatim.
//! - `MalformedResponse`: a 200 envelope whose `data` did not have the shape
//!   the operation expects.
//!
//! Nothing here is retried or recovered inside the client.

use thiserror::Error;

/// Failures below the service envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, DNS, TLS or I/O failure.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The transport gave up waiting for the service.
    #[error("request timed out")]
    Timeout,

    /// The body could not be decoded as JSON.
    #[error("undecodable response body: {0}")]
    Decode(String),

    /// A non-2xx HTTP status whose body was not a service envelope.
    #[error("unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

/// Errors returned by `BitlyApi` parse methods and the `Client` facade.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BitlyError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The service answered with a non-200 envelope.
    #[error("service error {status_code}: {status_txt}")]
    Service { status_code: i64, status_txt: String },

    /// A successful envelope was missing or mistyped the expected fields.
    #[error("malformed {operation} response: {reason}")]
    MalformedResponse {
        operation: &'static str,
        reason: String,
    },
}

impl BitlyError {
    pub(crate) fn malformed(operation: &'static str, reason: impl Into<String>) -> Self {
        BitlyError::MalformedResponse {
            operation,
            reason: reason.into(),
        }
    }

    /// The service status code, for service-reported failures.
    pub fn status_code(&self) -> Option<i64> {
        match self {
            BitlyError::Service { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// The service status text, for service-reported failures.
    pub fn status_txt(&self) -> Option<&str> {
        match self {
            BitlyError::Service { status_txt, .. } => Some(status_txt),
            _ => None,
        }
    }
}

/// Configuration could not be loaded from the environment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

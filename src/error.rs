//! Connection-level errors.
//!
//! Every variant is terminal for its connection: it is turned into a
//! plain-text error response at the point of detection and the socket is
//! closed right after.

use crate::http::parser::ParseError;
use crate::http::response::StatusCode;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("malformed request: {0}")]
    MalformedRequest(#[from] ParseError),

    #[error("no data received within {0:?}")]
    IdleTimeout(Duration),

    #[error("more than {limit} requests on one connection")]
    RequestLimitExceeded { limit: u32, retry_after: u64 },

    #[error("request finished with status {status}")]
    PluginReportedFailure {
        status: StatusCode,
        trace: String,
        retry: Option<u64>,
    },
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ServeError::IdleTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            ServeError::RequestLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ServeError::PluginReportedFailure { status, .. } => *status,
        }
    }

    /// Diagnostic for the error body. `None` means the peer address is used.
    ///
    /// An empty trace counts as missing.
    pub fn trace(&self) -> Option<&str> {
        let trace = match self {
            ServeError::MalformedRequest(e) => e.path(),
            ServeError::PluginReportedFailure { trace, .. } => Some(trace.as_str()),
            ServeError::IdleTimeout(_) | ServeError::RequestLimitExceeded { .. } => None,
        };
        trace.filter(|t| !t.is_empty())
    }

    pub fn retry(&self) -> Option<u64> {
        match self {
            ServeError::RequestLimitExceeded { retry_after, .. } => Some(*retry_after),
            ServeError::PluginReportedFailure { retry, .. } => *retry,
            _ => None,
        }
    }
}

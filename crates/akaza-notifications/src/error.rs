//! Error types for the notification stream proxy

use std::time::Duration;

use akaza_core::error_body::{self, ErrorBody};
use axum::http::StatusCode;
use thiserror::Error;

pub const CONNECT_FAILED_MESSAGE: &str = "Failed to connect to SSE server";
pub const TIMEOUT_MESSAGE: &str = "Request to SSE server timed out";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Errors that can occur while opening or relaying a notification stream
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Notifications service URL is not configured")]
    MissingUpstream,

    #[error("Invalid notifications service URL: {0}")]
    InvalidUpstream(String),

    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Failed to connect to SSE server: {0}")]
    UpstreamConnection(#[source] reqwest::Error),

    #[error("SSE upstream stream failed: {0}")]
    UpstreamStream(#[source] reqwest::Error),

    #[error("Request to SSE server timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("An unknown error occurred: {0}")]
    Unknown(String),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingCredentials => StatusCode::UNAUTHORIZED,
            ProxyError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::MissingUpstream
            | ProxyError::InvalidUpstream(_)
            | ProxyError::UpstreamConnection(_)
            | ProxyError::UpstreamStream(_)
            | ProxyError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProxyError> for ErrorBody {
    fn from(error: ProxyError) -> Self {
        let status = error.status_code();
        match error {
            ProxyError::MissingUpstream | ProxyError::InvalidUpstream(_) => {
                error_body::new(status).with_error(error.to_string())
            }

            ProxyError::MissingCredentials => error_body::new(status).with_error("Missing credentials"),

            ProxyError::UpstreamConnection(e) | ProxyError::UpstreamStream(e) => {
                error_body::new(status)
                    .with_error(CONNECT_FAILED_MESSAGE)
                    .with_details(e.to_string())
            }

            ProxyError::Timeout { .. } => error_body::new(status).with_error(TIMEOUT_MESSAGE),

            // Internal detail stays in the logs
            ProxyError::Unknown(_) => error_body::new(status).with_error(UNKNOWN_ERROR_MESSAGE),
        }
    }
}

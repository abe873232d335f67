//! Error types for the contact mailer

use akaza_core::error_body::{self, ErrorBody};
use axum::http::StatusCode;
use thiserror::Error;

pub const SEND_FAILED_MESSAGE: &str = "Failed to send message";

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ContactError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ContactError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ContactError> for ErrorBody {
    fn from(error: ContactError) -> Self {
        let status = error.status_code();
        match error {
            ContactError::Validation(reason) => error_body::new(status).with_error(reason),

            ContactError::Configuration(_) | ContactError::Address(_) => {
                error_body::new(status).with_error(error.to_string())
            }

            ContactError::Message(_) | ContactError::Transport(_) | ContactError::Delivery(_) => {
                error_body::new(status)
                    .with_error(SEND_FAILED_MESSAGE)
                    .with_details(error.to_string())
            }
        }
    }
}

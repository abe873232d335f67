//! Core utilities and types shared across all Akaza crates

pub mod error_body;
mod request_metadata;

pub use error_body::ErrorBody;
pub use request_metadata::ClientAddr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Notifications service URL is not configured (set {env})")]
    MissingNotificationsUrl { env: &'static str },

    #[error("Invalid notifications service URL '{url}': {reason}")]
    InvalidNotificationsUrl { url: String, reason: String },

    #[error("Invalid listen address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Stream timeout must be greater than zero")]
    InvalidTimeout,

    #[error("Invalid SMTP configuration: {details}")]
    InvalidSmtp { details: String },

    #[error("Unknown SMTP TLS mode '{0}' (expected none, starttls or tls)")]
    InvalidTlsMode(String),
}

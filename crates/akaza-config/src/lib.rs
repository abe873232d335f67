mod error;
mod server_config;
mod smtp;

pub use error::ConfigError;
pub use server_config::{
    ServerConfig, DEFAULT_ADDRESS, DEFAULT_STREAM_TIMEOUT_SECS, NOTIFICATIONS_URL_ENV,
};
pub use smtp::{SmtpSettings, TlsMode, DEFAULT_SMTP_PORT};

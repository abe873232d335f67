use std::net::SocketAddr;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::{ConfigError, SmtpSettings};

pub const DEFAULT_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_STREAM_TIMEOUT_SECS: u64 = 300;
pub const NOTIFICATIONS_URL_ENV: &str = "AKAZA_NOTIFICATIONS_URL";

/// Process-wide server configuration, validated once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub address: SocketAddr,
    /// Base address of the upstream notifications service, e.g. `https://api.example.com`
    pub notifications_base_url: String,
    /// Ceiling on upstream inactivity for a single stream session
    pub stream_timeout: Duration,
    /// Reject stream requests that carry neither an Authorization header nor an authToken cookie
    pub require_credentials: bool,
    /// Contact mailer transport; the contact route is disabled when absent
    pub smtp: Option<SmtpSettings>,
}

impl ServerConfig {
    pub fn new(
        address: &str,
        notifications_url: Option<String>,
        stream_timeout_secs: u64,
        require_credentials: bool,
        smtp: Option<SmtpSettings>,
    ) -> Result<Self, ConfigError> {
        let address = address
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidAddress {
                address: address.to_string(),
                reason: e.to_string(),
            })?;

        let notifications_base_url = Self::validate_notifications_url(notifications_url)?;

        if stream_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        debug!(
            "Server configuration loaded: address={}, notifications={}, timeout={}s, smtp={}",
            address,
            notifications_base_url,
            stream_timeout_secs,
            smtp.is_some()
        );

        Ok(ServerConfig {
            address,
            notifications_base_url,
            stream_timeout: Duration::from_secs(stream_timeout_secs),
            require_credentials,
            smtp,
        })
    }

    fn validate_notifications_url(raw: Option<String>) -> Result<String, ConfigError> {
        let raw = raw
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingNotificationsUrl {
                env: NOTIFICATIONS_URL_ENV,
            })?;

        let invalid = |reason: &str| ConfigError::InvalidNotificationsUrl {
            url: raw.clone(),
            reason: reason.to_string(),
        };

        let parsed = Url::parse(&raw).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.host_str().is_none() {
            return Err(invalid("missing host"));
        }

        Ok(raw)
    }
}

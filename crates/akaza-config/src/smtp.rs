use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// Plain connection, no TLS at all
    None,
    /// Upgrade a plain connection with STARTTLS
    #[default]
    Starttls,
    /// Direct TLS connection (SMTPS)
    Tls,
}

impl FromStr for TlsMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "plain" => Ok(TlsMode::None),
            "starttls" => Ok(TlsMode::Starttls),
            "tls" | "smtps" => Ok(TlsMode::Tls),
            other => Err(ConfigError::InvalidTlsMode(other.to_string())),
        }
    }
}

/// SMTP transport used by the contact mailer
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub tls_mode: TlsMode,
    /// Sender mailbox, e.g. `Akaza <no-reply@akaza.jobs>`
    pub from: String,
    /// Mailbox that receives contact submissions
    pub to: String,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("tls_mode", &self.tls_mode)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

impl SmtpSettings {
    /// Read SMTP settings from `AKAZA_SMTP_*` / `AKAZA_CONTACT_*` environment variables.
    ///
    /// Returns `Ok(None)` when `AKAZA_SMTP_HOST` is unset, which disables the contact route.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let Some(host) = get("AKAZA_SMTP_HOST") else {
            return Ok(None);
        };

        let port = match get("AKAZA_SMTP_PORT") {
            Some(port) => port.parse::<u16>().map_err(|e| ConfigError::InvalidSmtp {
                details: format!("AKAZA_SMTP_PORT '{}': {}", port, e),
            })?,
            None => DEFAULT_SMTP_PORT,
        };

        let tls_mode = get("AKAZA_SMTP_TLS")
            .map(|mode| mode.parse::<TlsMode>())
            .transpose()?
            .unwrap_or_default();

        let from = get("AKAZA_CONTACT_FROM").ok_or_else(|| ConfigError::InvalidSmtp {
            details: "AKAZA_CONTACT_FROM is required when AKAZA_SMTP_HOST is set".to_string(),
        })?;
        let to = get("AKAZA_CONTACT_TO").ok_or_else(|| ConfigError::InvalidSmtp {
            details: "AKAZA_CONTACT_TO is required when AKAZA_SMTP_HOST is set".to_string(),
        })?;

        Ok(Some(SmtpSettings {
            host,
            port,
            username: get("AKAZA_SMTP_USERNAME"),
            password: lookup("AKAZA_SMTP_PASSWORD"),
            tls_mode,
            from,
            to,
        }))
    }
}

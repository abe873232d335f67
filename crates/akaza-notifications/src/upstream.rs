//! Upstream stream address resolution

use std::fmt;

use url::Url;

use crate::ProxyError;

/// Path appended to the configured base address
pub const STREAM_PATH: &str = "/notifications/stream";

/// Fully resolved URL of the upstream event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    url: Url,
}

impl UpstreamTarget {
    /// Build the target from a base address such as `https://api.akaza.jobs/v1`.
    ///
    /// The base must be non-empty and absolute. A trailing slash is not doubled.
    pub fn from_base(base: &str) -> Result<Self, ProxyError> {
        let base = base.trim();
        if base.is_empty() {
            return Err(ProxyError::MissingUpstream);
        }

        let joined = format!("{}{}", base.trim_end_matches('/'), STREAM_PATH);
        let url = Url::parse(&joined)
            .map_err(|e| ProxyError::InvalidUpstream(format!("{}: {}", base, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProxyError::InvalidUpstream(format!(
                "{}: unsupported scheme '{}'",
                base,
                url.scheme()
            )));
        }

        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

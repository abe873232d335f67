use std::time::Duration;

use akaza_core::ClientAddr;
use axum::body::Body;
use axum::http::header::{
    ACCEPT, ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, CACHE_CONTROL, CONNECTION,
    CONTENT_ENCODING, CONTENT_TYPE,
};
use axum::http::StatusCode;
use axum::response::Response;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::session;
use crate::{Credential, ProxyError, UpstreamTarget};

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);

const USER_AGENT: &str = "Akaza-Notifications/1.0";
const EVENT_STREAM: &str = "text/event-stream";

#[derive(Debug, Clone)]
pub struct ProxySettings {
    /// Base address of the notifications service; `None` fails every request
    pub base_url: Option<String>,
    /// Ceiling on upstream inactivity, both before and after headers are sent
    pub idle_timeout: Duration,
    /// Reject requests without any credential instead of forwarding `Bearer undefined`
    pub require_credentials: bool,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            base_url: None,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            require_credentials: false,
        }
    }
}

/// Opens upstream notification streams on behalf of browser clients
pub struct NotificationProxy {
    http_client: reqwest::Client,
    target: Option<UpstreamTarget>,
    idle_timeout: Duration,
    require_credentials: bool,
}

impl NotificationProxy {
    pub fn new(settings: ProxySettings) -> Result<Self, ProxyError> {
        let target = match settings.base_url.as_deref().map(str::trim) {
            Some(base) if !base.is_empty() => Some(UpstreamTarget::from_base(base)?),
            _ => {
                warn!("Notifications service URL is not set; stream requests will fail");
                None
            }
        };

        // Idle pooling is disabled so every session gets its own connection
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProxyError::Unknown(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            target,
            idle_timeout: settings.idle_timeout,
            require_credentials: settings.require_credentials,
        })
    }

    pub fn target(&self) -> Option<&UpstreamTarget> {
        self.target.as_ref()
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Open one upstream connection and return the client-facing SSE response.
    ///
    /// Every error is returned before any response exists, so the caller
    /// writes at most one response. Failures after this returns are only
    /// logged by the relay.
    pub async fn open_session(
        &self,
        credential: Credential,
        client: ClientAddr,
    ) -> Result<Response, ProxyError> {
        let target = self.target.as_ref().ok_or(ProxyError::MissingUpstream)?;

        if self.require_credentials && credential.is_missing() {
            return Err(ProxyError::MissingCredentials);
        }

        debug!(
            "Connecting to {} for {} (credential from {})",
            target,
            client,
            credential.source()
        );

        let request = self
            .http_client
            .get(target.url().clone())
            .header(AUTHORIZATION, credential.header_value().clone())
            .header(ACCEPT, EVENT_STREAM)
            .send();

        // Dropping the pending request on timeout aborts the upstream connection
        let upstream = match timeout(self.idle_timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(ProxyError::UpstreamConnection(e)),
            Err(_) => {
                return Err(ProxyError::Timeout {
                    after: self.idle_timeout,
                })
            }
        };

        let status = upstream.status();
        if !status.is_success() {
            warn!(
                "Notifications service answered {} for {}; relaying body unchanged",
                status, client
            );
        }

        info!("Notification stream opened for {}", client);

        let relay = session::relay(upstream.bytes_stream(), self.idle_timeout, client);
        event_stream_response(Body::from_stream(relay))
    }
}

fn event_stream_response(body: Body) -> Result<Response, ProxyError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, EVENT_STREAM)
        .header(CACHE_CONTROL, "no-cache")
        .header(CONNECTION, "keep-alive")
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(CONTENT_ENCODING, "identity")
        .header("x-accel-buffering", "no")
        .body(body)
        .map_err(|e| ProxyError::Unknown(e.to_string()))
}

use std::sync::Arc;

use akaza_core::{ClientAddr, ErrorBody};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tracing::{error, info, warn};

use crate::{resolve_credential, NotificationProxy, ProxyError, STREAM_PATH};

pub struct NotificationsAppState {
    pub proxy: Arc<NotificationProxy>,
}

pub fn configure_routes() -> Router<Arc<NotificationsAppState>> {
    Router::new().route(STREAM_PATH, get(notifications_stream))
}

/// Open a Server-Sent-Events stream relayed from the notifications service
///
/// Errors are returned as JSON only while nothing has been written to the
/// client; once the 200 response is out, failures end the body instead.
pub async fn notifications_stream(
    State(state): State<Arc<NotificationsAppState>>,
    client: ClientAddr,
    headers: HeaderMap,
) -> Result<Response, ErrorBody> {
    let credential = resolve_credential(&headers);
    info!(
        "Notification stream requested by {} (credential: {})",
        client,
        credential.source()
    );

    state
        .proxy
        .open_session(credential, client.clone())
        .await
        .map_err(|e| {
            match &e {
                ProxyError::MissingCredentials => {
                    warn!("Rejected notification stream for {}: {}", client, e)
                }
                ProxyError::Timeout { .. } => {
                    warn!("Notification stream for {} timed out: {}", client, e)
                }
                _ => error!("Failed to open notification stream for {}: {}", client, e),
            }
            e.into()
        })
}

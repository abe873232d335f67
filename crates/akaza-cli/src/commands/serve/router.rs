use std::sync::Arc;

use akaza_config::ServerConfig;
use akaza_contact::{ContactAppState, SmtpContactMailer};
use akaza_notifications::{NotificationProxy, NotificationsAppState, ProxySettings};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Assemble every route under `/api`
pub fn build_router(config: &ServerConfig) -> anyhow::Result<Router> {
    let proxy = NotificationProxy::new(ProxySettings {
        base_url: Some(config.notifications_base_url.clone()),
        idle_timeout: config.stream_timeout,
        require_credentials: config.require_credentials,
    })?;
    let notifications_state = Arc::new(NotificationsAppState {
        proxy: Arc::new(proxy),
    });

    let mut api = Router::new()
        .route("/health", get(health))
        .merge(akaza_notifications::configure_routes().with_state(notifications_state));

    match &config.smtp {
        Some(smtp) => {
            let mailer = SmtpContactMailer::new(smtp)?;
            let contact_state = Arc::new(ContactAppState {
                mailer: Arc::new(mailer),
            });
            api = api.merge(akaza_contact::configure_routes().with_state(contact_state));
            info!("Contact route enabled via {}:{}", smtp.host, smtp.port);
        }
        None => info!("SMTP is not configured; contact route disabled"),
    }

    debug!("Router assembled");
    Ok(Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http()))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

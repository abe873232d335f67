use std::sync::Arc;

use akaza_core::{ClientAddr, ErrorBody};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info, warn};

use crate::{ContactError, ContactMailer, ContactMessage, ContactResponse};

pub struct ContactAppState {
    pub mailer: Arc<dyn ContactMailer>,
}

pub fn configure_routes() -> Router<Arc<ContactAppState>> {
    Router::new().route("/contact", post(send_contact))
}

/// Validate a contact-form submission and relay it by email
pub async fn send_contact(
    State(state): State<Arc<ContactAppState>>,
    client: ClientAddr,
    Json(message): Json<ContactMessage>,
) -> Result<Json<ContactResponse>, ErrorBody> {
    if let Err(e) = message.validate() {
        warn!("Rejected contact submission from {}: {}", client, e);
        return Err(e.into());
    }

    state.mailer.send(&message).await.map_err(|e: ContactError| {
        error!(
            "Failed to send contact message from {} via {}: {}",
            client,
            state.mailer.name(),
            e
        );
        ErrorBody::from(e)
    })?;

    info!("Contact message from {} sent via {}", client, state.mailer.name());
    Ok(Json(ContactResponse::sent()))
}

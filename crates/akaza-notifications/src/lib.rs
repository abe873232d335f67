//! akaza-notifications: notification stream proxy
//!
//! Relays a long-lived Server-Sent-Events stream from the upstream
//! notifications service to browser clients, one upstream connection per
//! client request.

pub mod credentials;
pub mod error;
pub mod handlers;
pub mod services;
pub mod upstream;

pub use credentials::{resolve_credential, Credential, CredentialSource, AUTH_COOKIE_NAME};
pub use error::ProxyError;
pub use handlers::{configure_routes, NotificationsAppState};
pub use services::{NotificationProxy, ProxySettings};
pub use upstream::{UpstreamTarget, STREAM_PATH};

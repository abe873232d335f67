//! Notification proxy service
//!
//! `NotificationProxy` owns the upstream HTTP client and opens one upstream
//! connection per stream session; `session` relays the upstream body to the
//! client and tears the upstream leg down when either side goes away.

mod proxy_service;
mod session;

pub use proxy_service::{NotificationProxy, ProxySettings, DEFAULT_IDLE_TIMEOUT};

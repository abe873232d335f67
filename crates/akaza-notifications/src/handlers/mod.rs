mod handler;

pub use handler::{configure_routes, notifications_stream, NotificationsAppState};

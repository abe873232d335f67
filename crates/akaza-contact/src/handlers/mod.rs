//! HTTP handlers for the contact mailer

mod contact;

pub use contact::{configure_routes, send_contact, ContactAppState};

//! Contact form mailer for Akaza
//!
//! Accepts contact-form submissions from the marketing pages and relays them
//! as plain-text email through an SMTP transport.

pub mod errors;
pub mod handlers;
pub mod providers;
pub mod types;

pub use errors::ContactError;
pub use handlers::{configure_routes, ContactAppState};
pub use providers::{ContactMailer, SmtpContactMailer};
pub use types::{ContactMessage, ContactResponse};

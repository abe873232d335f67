//! Mail transport abstractions and implementations

mod smtp;
mod traits;

#[cfg(test)]
pub mod mock;

pub use smtp::SmtpContactMailer;
pub use traits::ContactMailer;

#[cfg(test)]
pub use mock::MockContactMailer;

use async_trait::async_trait;

use crate::{ContactError, ContactMessage};

/// Delivers validated contact submissions
#[async_trait]
pub trait ContactMailer: Send + Sync {
    async fn send(&self, message: &ContactMessage) -> Result<(), ContactError>;

    /// Short transport name for logs
    fn name(&self) -> &'static str;
}

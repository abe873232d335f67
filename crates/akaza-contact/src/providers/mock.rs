//! Mock mailer for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::providers::ContactMailer;
use crate::{ContactError, ContactMessage};

#[derive(Debug, Clone, Default)]
pub struct MockContactMailer {
    pub send_count: Arc<AtomicUsize>,
    pub sent: Arc<Mutex<Vec<ContactMessage>>>,
    pub should_fail_send: bool,
}

impl MockContactMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_send_failure(mut self) -> Self {
        self.should_fail_send = true;
        self
    }

    pub fn send_call_count(&self) -> usize {
        self.send_count.load(Ordering::SeqCst)
    }

    pub async fn sent_messages(&self) -> Vec<ContactMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl ContactMailer for MockContactMailer {
    async fn send(&self, message: &ContactMessage) -> Result<(), ContactError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);

        if self.should_fail_send {
            return Err(ContactError::Delivery("Mock send failure".to_string()));
        }

        self.sent.lock().await.push(message.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

use lettre::message::Mailbox;
use lettre::Address;
use serde::{Deserialize, Serialize};

use crate::ContactError;

pub const DEFAULT_SUBJECT: &str = "New contact form submission";
pub const SUCCESS_MESSAGE: &str = "Message sent successfully";

/// A contact-form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::Validation("Name is required".to_string()));
        }
        if self.message.trim().is_empty() {
            return Err(ContactError::Validation("Message is required".to_string()));
        }
        self.sender_address()?;
        Ok(())
    }

    fn sender_address(&self) -> Result<Address, ContactError> {
        self.email
            .trim()
            .parse::<Address>()
            .map_err(|_| ContactError::Validation("Invalid email address".to_string()))
    }

    /// Submitter as a mailbox, used for `Reply-To`
    pub fn reply_to(&self) -> Result<Mailbox, ContactError> {
        Ok(Mailbox::new(
            Some(self.name.trim().to_string()),
            self.sender_address()?,
        ))
    }

    pub fn subject_line(&self) -> String {
        let subject = self
            .subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SUBJECT);
        format!("[Contact] {}", subject)
    }

    pub fn text_body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\n\nMessage:\n{}\n",
            self.name.trim(),
            self.email.trim(),
            self.message
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

impl ContactResponse {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

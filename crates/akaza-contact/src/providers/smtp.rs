use akaza_config::{SmtpSettings, TlsMode};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::providers::ContactMailer;
use crate::{ContactError, ContactMessage};

/// Sends contact submissions through an SMTP relay
pub struct SmtpContactMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpContactMailer {
    /// Build the transport. No connection is made until the first send.
    pub fn new(settings: &SmtpSettings) -> Result<Self, ContactError> {
        if settings.host.trim().is_empty() {
            return Err(ContactError::Configuration("SMTP host is empty".to_string()));
        }

        let from: Mailbox = settings.from.parse()?;
        let to: Mailbox = settings.to.parse()?;

        let credentials = settings
            .username
            .as_ref()
            .filter(|username| !username.is_empty())
            .map(|username| {
                Credentials::new(
                    username.clone(),
                    settings.password.clone().unwrap_or_default(),
                )
            });

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
                .port(settings.port);

        builder = match settings.tls_mode {
            TlsMode::None => builder,
            TlsMode::Starttls => {
                builder.tls(Tls::Required(TlsParameters::new(settings.host.clone())?))
            }
            TlsMode::Tls => builder.tls(Tls::Wrapper(TlsParameters::new(settings.host.clone())?)),
        };

        if let Some(credentials) = credentials {
            builder = builder.credentials(credentials);
        }

        debug!(
            "Configured SMTP transport {}:{} ({:?})",
            settings.host, settings.port, settings.tls_mode
        );

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }

    /// Render the outgoing email for a submission
    pub fn compose(&self, message: &ContactMessage) -> Result<Message, ContactError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .reply_to(message.reply_to()?)
            .subject(message.subject_line())
            .header(ContentType::TEXT_PLAIN)
            .body(message.text_body())?;
        Ok(email)
    }
}

#[async_trait]
impl ContactMailer for SmtpContactMailer {
    async fn send(&self, message: &ContactMessage) -> Result<(), ContactError> {
        let email = self.compose(message)?;
        let response = self.transport.send(email).await?;
        info!(
            "Contact message from {} accepted by SMTP server (code {})",
            message.email.trim(),
            response.code()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::{Constants, MailSettings};
use crate::error::MailError;

/// SMTP mailer used for login codes.
#[derive(Clone)]
pub struct Mailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl Mailer {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let transport = SmtpTransport::starttls_relay(&settings.host)?
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.pass.clone(),
            ))
            .build();
        let from = format!("{} <{}>", Constants::EMAIL_SENDER_NAME, settings.from).parse()?;
        Ok(Self { transport, from })
    }

    /// Send a plain-text email.
    ///
    /// The SMTP transport is blocking, so the send runs on the blocking pool.
    pub async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), MailError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(None, to.parse()?))
            .subject(subject)
            .body(body)?;

        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&email)).await??;
        tracing::debug!(to, "email accepted by SMTP server");
        Ok(())
    }
}

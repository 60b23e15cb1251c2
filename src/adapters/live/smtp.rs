//! Live adapter that delivers mail over SMTP.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::MailSecurity;
use crate::error::SiteError;
use crate::ports::mail_sender::{Delivery, MailSender, OutgoingMail, SendFuture};

/// Connection settings for [`SmtpMailSender`].
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Connection security.
    pub security: MailSecurity,
    /// Username and password, when the server requires authentication.
    pub credentials: Option<(String, String)>,
}

/// Sends mail through an SMTP relay such as Gmail.
pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailSender {
    /// Build a sender for the given relay. No connection is opened until the
    /// first send.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS parameters for `host` cannot be built.
    pub fn new(settings: SmtpSettings) -> Result<Self, SiteError> {
        let builder = match settings.security {
            MailSecurity::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                .map_err(|e| SiteError::Mail(e.to_string()))?,
            MailSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| SiteError::Mail(e.to_string()))?,
            MailSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host),
        };

        let builder = builder.port(settings.port);
        let builder = match settings.credentials {
            Some((user, password)) => builder.credentials(Credentials::new(user, password)),
            None => builder,
        };

        Ok(Self { transport: builder.build() })
    }
}

impl MailSender for SmtpMailSender {
    fn send(&self, mail: &OutgoingMail) -> SendFuture<'_> {
        let message = build_message(mail);
        Box::pin(async move {
            let response = self
                .transport
                .send(message?)
                .await
                .map_err(|e| SiteError::Mail(e.to_string()))?;

            let text = response.message().map(|line| line.to_string()).collect::<Vec<_>>().join(" ");
            Ok(Delivery { response: format!("{} {text}", response.code()) })
        })
    }
}

/// Convert an [`OutgoingMail`] into a plain-text MIME message.
fn build_message(mail: &OutgoingMail) -> Result<Message, SiteError> {
    let mut builder = Message::builder().from(parse_mailbox(&mail.from)?).subject(mail.subject.clone());
    for recipient in &mail.to {
        builder = builder.to(parse_mailbox(recipient)?);
    }
    builder
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body.clone())
        .map_err(|e| SiteError::Mail(format!("Failed to build message: {e}")))
}

fn parse_mailbox(address: &str) -> Result<Mailbox, SiteError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| SiteError::InvalidAddress { address: address.to_string(), reason: e.to_string() })
}

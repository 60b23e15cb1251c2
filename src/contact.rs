//! Contact form submissions and their conversion into relayed mail.

use url::form_urlencoded;

use crate::config::Config;
use crate::error::SiteError;
use crate::ports::mail_sender::{MailSender, OutgoingMail};

/// Text returned to the browser once the message has been handed off.
pub const SUCCESS_MESSAGE: &str = "Formulario enviado con éxito";

/// Form field carrying the visitor's name.
pub const FIELD_NAME: &str = "nombre";
/// Form field carrying the visitor's reply address.
pub const FIELD_EMAIL: &str = "email";
/// Form field carrying the message text.
pub const FIELD_MESSAGE: &str = "mensaje";

/// One submitted contact form. Lives only for the duration of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    /// Visitor's name.
    pub name: String,
    /// Visitor's email address, as typed. Not validated.
    pub email: String,
    /// Free-form message.
    pub message: String,
}

impl ContactSubmission {
    /// Parse an `application/x-www-form-urlencoded` body.
    ///
    /// When a field appears more than once the first value wins. Empty
    /// values are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::MissingField`] naming the first absent field.
    pub fn from_form(body: &[u8]) -> Result<Self, SiteError> {
        let mut name = None;
        let mut email = None;
        let mut message = None;

        for (key, value) in form_urlencoded::parse(body) {
            let slot = match key.as_ref() {
                FIELD_NAME => &mut name,
                FIELD_EMAIL => &mut email,
                FIELD_MESSAGE => &mut message,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        Ok(Self {
            name: name.ok_or(SiteError::MissingField(FIELD_NAME))?,
            email: email.ok_or(SiteError::MissingField(FIELD_EMAIL))?,
            message: message.ok_or(SiteError::MissingField(FIELD_MESSAGE))?,
        })
    }

    /// Labelled plain-text body of the relayed email.
    #[must_use]
    pub fn compose_body(&self) -> String {
        format!("De: {}\nEmail: {}\nMensaje: {}", self.name, self.email, self.message)
    }
}

/// Fixed envelope every submission is relayed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailRoute {
    /// Sender address.
    pub from: String,
    /// Recipient addresses.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
}

impl MailRoute {
    /// Resolve the envelope from config and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no sender address is configured.
    pub fn from_config(config: &Config) -> Result<Self, SiteError> {
        let from = config.mail_sender().ok_or_else(|| SiteError::MissingMailConfig {
            field: "sender address".into(),
            env_var: "SITEKIT_MAIL_SENDER".into(),
        })?;
        let to = config.mail_recipients();
        Ok(Self { from, to, subject: config.mail.subject.clone() })
    }

    /// Wrap a submission in this route's envelope.
    #[must_use]
    pub fn envelope(&self, submission: &ContactSubmission) -> OutgoingMail {
        OutgoingMail {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: self.subject.clone(),
            body: submission.compose_body(),
        }
    }
}

/// Parse a form body and relay it through `sender`.
///
/// Nothing is sent unless all three fields are present. Send failures are
/// returned unchanged and never retried.
///
/// # Errors
///
/// Returns [`SiteError::MissingField`] for an incomplete form, or whatever
/// error the sender reports.
pub async fn relay(body: &[u8], route: &MailRoute, sender: &dyn MailSender) -> Result<&'static str, SiteError> {
    let submission = ContactSubmission::from_form(body)?;
    let delivery = sender.send(&route.envelope(&submission)).await?;
    tracing::info!(recipients = route.to.len(), response = %delivery.response, "contact message relayed");
    Ok(SUCCESS_MESSAGE)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ports::mail_sender::{Delivery, SendFuture};

    #[derive(Default)]
    struct CapturingSender {
        sent: Mutex<Vec<OutgoingMail>>,
        fail: bool,
    }

    impl MailSender for CapturingSender {
        fn send(&self, mail: &OutgoingMail) -> SendFuture<'_> {
            self.sent.lock().unwrap().push(mail.clone());
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    Err(SiteError::Mail("421 service not available".into()))
                } else {
                    Ok(Delivery { response: "250 OK".into() })
                }
            })
        }
    }

    fn route() -> MailRoute {
        MailRoute {
            from: "web@example.com".into(),
            to: vec!["me@example.com".into()],
            subject: "Nuevo mensaje de contacto".into(),
        }
    }

    #[test]
    fn parses_encoded_fields() {
        let s = ContactSubmission::from_form(
            b"nombre=Ana+P%C3%A9rez&email=ana%40example.com&mensaje=Hola%2C%0Aqu%C3%A9+tal",
        )
        .unwrap();
        assert_eq!(s.name, "Ana Pérez");
        assert_eq!(s.email, "ana@example.com");
        assert_eq!(s.message, "Hola,\nqué tal");
    }

    #[test]
    fn body_uses_labelled_lines() {
        let s = ContactSubmission {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            message: "Hola".into(),
        };
        assert_eq!(s.compose_body(), "De: Ana\nEmail: ana@example.com\nMensaje: Hola");
    }

    #[test]
    fn empty_values_count_as_present() {
        let s = ContactSubmission::from_form(b"nombre=&email=&mensaje=").unwrap();
        assert_eq!(s.compose_body(), "De: \nEmail: \nMensaje: ");
    }

    #[test]
    fn first_duplicate_wins_and_extras_are_ignored() {
        let s = ContactSubmission::from_form(b"nombre=A&nombre=B&email=e&mensaje=m&_gotcha=x").unwrap();
        assert_eq!(s.name, "A");
    }

    #[test]
    fn missing_field_is_named() {
        let err = ContactSubmission::from_form(b"nombre=Ana&mensaje=Hola").unwrap_err();
        assert!(matches!(err, SiteError::MissingField("email")));
        assert_eq!(err.to_string(), "Missing form field: email");
    }

    #[tokio::test]
    async fn relay_sends_composed_mail_and_returns_success() {
        let sender = CapturingSender::default();
        let reply = relay(b"nombre=Ana&email=ana%40example.com&mensaje=Hola", &route(), &sender)
            .await
            .unwrap();

        assert_eq!(reply, "Formulario enviado con éxito");
        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, "web@example.com");
        assert_eq!(sent[0].to, vec!["me@example.com".to_string()]);
        assert_eq!(sent[0].subject, "Nuevo mensaje de contacto");
        assert_eq!(sent[0].body, "De: Ana\nEmail: ana@example.com\nMensaje: Hola");
    }

    #[tokio::test]
    async fn relay_never_sends_incomplete_form() {
        let sender = CapturingSender::default();
        let err = relay(b"nombre=Ana&email=ana%40example.com", &route(), &sender).await.unwrap_err();

        assert!(matches!(err, SiteError::MissingField("mensaje")));
        assert!(sender.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn relay_propagates_send_failure() {
        let sender = CapturingSender { fail: true, ..CapturingSender::default() };
        let err = relay(b"nombre=A&email=e&mensaje=m", &route(), &sender).await.unwrap_err();
        assert!(matches!(err, SiteError::Mail(_)));
    }

    #[tokio::test]
    async fn resubmission_sends_twice() {
        let sender = CapturingSender::default();
        for _ in 0..2 {
            relay(b"nombre=A&email=e&mensaje=m", &route(), &sender).await.unwrap();
        }
        assert_eq!(sender.sent.lock().unwrap().len(), 2);
    }
}

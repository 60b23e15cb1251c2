//! Mail sender port for handing relayed messages to a mail transport.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::SiteError;

/// A plain-text message ready to be handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMail {
    /// Sender address.
    pub from: String,
    /// Recipient addresses, in delivery order.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Acknowledgement returned by the transport once a message is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    /// Server response, e.g. `"250 2.0.0 OK"`.
    pub response: String,
}

/// Boxed future type returned by [`MailSender::send`].
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<Delivery, SiteError>> + Send + 'a>>;

/// Sends mail through an external transport.
pub trait MailSender: Send + Sync {
    /// Send one message.
    fn send(&self, mail: &OutgoingMail) -> SendFuture<'_>;
}

//! Replaying adapter for the `MailSender` port.

use std::sync::{Arc, Mutex};

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::SiteError;
use crate::ports::mail_sender::{Delivery, MailSender, OutgoingMail, SendFuture};

/// Serves recorded send results from a cassette without touching the network.
pub struct ReplayingMailSender {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingMailSender {
    /// Create a replaying sender backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl MailSender for ReplayingMailSender {
    fn send(&self, _mail: &OutgoingMail) -> SendFuture<'_> {
        let result = replay_result::<Delivery>(&self.replayer, "mail_sender", "send");
        Box::pin(async move { result.map_err(SiteError::Mail) })
    }
}

//! Recording adapter for the `MailSender` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::mail_sender::{MailSender, OutgoingMail, SendFuture};

/// Records every send while delegating to an inner sender.
pub struct RecordingMailSender {
    inner: Box<dyn MailSender>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingMailSender {
    /// Creates a new recording sender wrapping the given implementation.
    pub fn new(inner: Box<dyn MailSender>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl MailSender for RecordingMailSender {
    fn send(&self, mail: &OutgoingMail) -> SendFuture<'_> {
        let mail = mail.clone();
        Box::pin(async move {
            let result = self.inner.send(&mail).await;
            record_result(&self.recorder, "mail_sender", "send", &mail, &result);
            result
        })
    }
}

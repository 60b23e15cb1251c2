//! Service context that bundles all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::smtp::{SmtpMailSender, SmtpSettings};
use crate::adapters::recording::mail_sender::RecordingMailSender;
use crate::adapters::replaying::mail_sender::ReplayingMailSender;
use crate::cassette::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::Config;
use crate::error::SiteError;
use crate::ports::MailSender;

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Mail sender port.
    pub sender: Box<dyn MailSender>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette to disk.
    ///
    /// Drop the [`ServiceContext`] first; the recording adapter holds a
    /// reference to the recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        if recorder.is_empty() {
            tracing::warn!("no mail was sent, writing an empty cassette");
        } else {
            tracing::debug!(interactions = recorder.len(), "writing cassette");
        }
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context that sends through the configured SMTP relay.
    ///
    /// # Errors
    ///
    /// Returns an error if a password is configured without a username, or
    /// the transport cannot be built.
    pub fn live(config: &Config) -> Result<Self, SiteError> {
        let credentials = match (config.smtp_username(), config.smtp_password()) {
            (Some(user), Some(password)) => Some((user, password)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(SiteError::MissingMailConfig {
                    field: "SMTP password".into(),
                    env_var: "SITEKIT_SMTP_PASSWORD".into(),
                })
            }
            (None, Some(_)) => {
                return Err(SiteError::MissingMailConfig {
                    field: "SMTP username".into(),
                    env_var: "SITEKIT_SMTP_USERNAME".into(),
                })
            }
        };

        let sender = SmtpMailSender::new(SmtpSettings {
            host: config.mail.host.clone(),
            port: config.mail.port,
            security: config.mail.security,
            credentials,
        })?;
        tracing::debug!(host = %config.mail.host, port = config.mail.port, "using live SMTP transport");
        Ok(Self { sender: Box::new(sender) })
    }

    /// Create a recording context that wraps the live sender with a recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the live sender cannot be built.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), SiteError> {
        let live = Self::live(config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".sitekit/cassettes")
            .join(&timestamp)
            .join("mail_sender.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-mail_sender"),
            get_commit_hash(),
        )));

        let sender = RecordingMailSender::new(live.sender, Arc::clone(&recorder));
        Ok((Self { sender: Box::new(sender) }, RecordingSession { recorder }))
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, SiteError> {
        let replayer = load_cassette(path)
            .map_err(|e| SiteError::Config(format!("Failed to load cassette: {e}")))?;
        let sender = ReplayingMailSender::new(Arc::new(Mutex::new(replayer)));
        Ok(Self { sender: Box::new(sender) })
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}

//! Unified error type for sitekit.

use thiserror::Error;

/// Errors that can occur while relaying mail or generating logo assets.
#[derive(Debug, Error)]
pub enum SiteError {
    /// A required form field was not present in the submission.
    #[error("Missing form field: {0}")]
    MissingField(&'static str),

    /// The mail transport rejected or failed to deliver a message.
    #[error("Mail error: {0}")]
    Mail(String),

    /// A sender or recipient address could not be parsed.
    #[error("Invalid email address '{address}': {reason}")]
    InvalidAddress {
        /// The offending address.
        address: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A mail setting needed by the live transport is not configured.
    #[error("No {field} configured. Set {env_var} or add it to the [mail] section of the config file.")]
    MissingMailConfig {
        /// The missing setting.
        field: String,
        /// The environment variable that can provide it.
        env_var: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Rasterizing or encoding an image failed.
    #[error("Image error: {0}")]
    Image(String),

    /// The HTTP listener could not be started or stopped accepting.
    #[error("HTTP server error: {0}")]
    Http(String),
}

impl From<image::ImageError> for SiteError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e.to_string())
    }
}

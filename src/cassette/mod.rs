//! Record/replay of port interactions for deterministic testing.
//!
//! A cassette is a YAML file holding the interactions a session had with
//! an external port. Outputs follow the `{"Ok": ..}` / `{"Err": ".."}`
//! convention so a replayed call fails the same way the recorded one did.

pub mod recorder;
pub mod replayer;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use self::replayer::CassetteReplayer;

/// On-disk cassette file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable session name.
    pub name: String,
    /// When the session was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Commit the recording binary was built from, or `"unknown"`.
    pub commit: String,
    /// Recorded interactions in call order.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

/// One call made through a port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Position in the whole session, across all ports.
    pub seq: u64,
    /// Port name, e.g. `"mail_sender"`.
    pub port: String,
    /// Method name on the port, e.g. `"send"`.
    pub method: String,
    /// Serialized call arguments.
    pub input: serde_json::Value,
    /// Serialized result.
    pub output: serde_json::Value,
}

/// Load a cassette file and create a replayer.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
    let cassette: Cassette = serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
    Ok(CassetteReplayer::new(&cassette))
}

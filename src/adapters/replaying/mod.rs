//! Replaying adapters that serve recorded interactions from cassettes.

pub mod mail_sender;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

/// Take the next recorded result for `port`/`method` and decode it.
///
/// A recorded `Err` comes back as its message; so does a cassette that has
/// run out of interactions.
pub(crate) fn replay_result<T: DeserializeOwned>(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<T, String> {
    let output = {
        let mut guard = replayer.lock().map_err(|_| "cassette replayer lock poisoned".to_string())?;
        let interaction = guard.next_interaction(port, method)?;
        tracing::debug!(port, method, seq = interaction.seq, remaining = guard.remaining(), "replayed interaction");
        interaction.output
    };

    if let Some(err) = output.get("Err") {
        return Err(err.as_str().unwrap_or("replayed error").to_string());
    }
    let value = output.get("Ok").cloned().unwrap_or(output);
    serde_json::from_value(value).map_err(|e| format!("Malformed {port}::{method} output in cassette: {e}"))
}

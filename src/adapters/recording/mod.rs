//! Recording adapters that capture interactions to cassettes.

pub mod mail_sender;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;

/// Record one call, logging instead of failing when the recorder is unusable.
pub(crate) fn record_result<I, T, E>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    I: Serialize,
    T: Serialize,
    E: std::fmt::Display,
{
    let Ok(mut guard) = recorder.lock() else {
        tracing::warn!(port, method, "cassette recorder lock poisoned, interaction dropped");
        return;
    };
    if let Err(e) = guard.record(port, method, input, result) {
        tracing::warn!(port, method, error = %e, "failed to serialize interaction");
    }
}

//! Serves recorded interactions back in the order they were recorded.

use std::collections::{HashMap, VecDeque};

use super::{Cassette, Interaction};

/// Replays interactions from a loaded cassette, one queue per port/method pair.
#[derive(Debug, Default)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Take the next interaction recorded for `port`/`method`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing was recorded for the pair, or every
    /// recorded interaction has already been served.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<Interaction, String> {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            return Err(format!(
                "Cassette has no interactions recorded for {port}::{method}. \
                 Available: [{}]",
                available.join(", ")
            ));
        };
        queue
            .pop_front()
            .ok_or_else(|| format!("Cassette exhausted: every {port}::{method} interaction was already replayed"))
    }

    /// Number of interactions not yet served, across all ports.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn send(seq: u64, response: &str) -> Interaction {
        Interaction {
            seq,
            port: "mail_sender".into(),
            method: "send".into(),
            input: json!({}),
            output: json!({"Ok": {"response": response}}),
        }
    }

    fn cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), commit: "abc".into(), interactions }
    }

    #[test]
    fn replays_in_recorded_order() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![send(0, "first"), send(1, "second")]));
        assert_eq!(replayer.remaining(), 2);

        assert_eq!(replayer.next_interaction("mail_sender", "send").unwrap().seq, 0);
        assert_eq!(replayer.next_interaction("mail_sender", "send").unwrap().seq, 1);
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    fn exhausted_queue_is_an_error() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![send(0, "only")]));
        let _ = replayer.next_interaction("mail_sender", "send").unwrap();

        let err = replayer.next_interaction("mail_sender", "send").unwrap_err();
        assert!(err.contains("Cassette exhausted"));
    }

    #[test]
    fn unknown_port_lists_available_pairs() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![send(0, "only")]));
        let err = replayer.next_interaction("image_canvas", "draw").unwrap_err();
        assert!(err.contains("no interactions recorded for image_canvas::draw"));
        assert!(err.contains("mail_sender::send"));
    }
}

//! Sync session configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection and timing knobs for one sync session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Host endpoint that takes input envelopes (`host:port`)
    pub input_addr: String,
    /// Host endpoint that publishes state snapshots (`host:port`)
    pub state_addr: String,
    /// Input envelopes per second
    pub publish_rate_hz: u32,
    /// Grace period for an in-flight send at shutdown
    pub linger_ms: u64,
    /// Index into the snapshot's entity list of the entity to track
    pub tracked_entity: usize,
}

impl SyncConfig {
    pub fn linger(&self) -> Duration {
        Duration::from_millis(self.linger_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            input_addr: "localhost:25001".to_string(),
            state_addr: "localhost:25000".to_string(),
            publish_rate_hz: 30,
            linger_ms: 1,
            tracked_entity: 0,
        }
    }
}

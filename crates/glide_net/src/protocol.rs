//! Wire messages exchanged with the simulation host
//!
//! Both directions are JSON, one message per datagram:
//!
//! ```text
//! client -> host   {"event": {"keys": {"97": true, "100": false}}}
//! host -> client   {"player_states": [{"x": 12.0, "y": 40.5}], "game_seconds": 3.2}
//! ```

use glide_core::math::DVec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::DecodeError;

/// Datagram a state subscriber sends once so the host starts publishing to it.
pub const SUBSCRIBE: &[u8] = b"SUB";

/// Key code as reported by the input device layer.
pub type KeySymbol = u32;

/// Pressed-state of every key seen so far, captured at one publish tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub keys: BTreeMap<KeySymbol, bool>,
}

impl InputSnapshot {
    pub fn is_pressed(&self, symbol: KeySymbol) -> bool {
        self.keys.get(&symbol).copied().unwrap_or(false)
    }
}

impl FromIterator<(KeySymbol, bool)> for InputSnapshot {
    fn from_iter<I: IntoIterator<Item = (KeySymbol, bool)>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// Outbound envelope around one input snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputEvent {
    pub event: InputSnapshot,
}

/// One entity's authoritative state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub x: f64,
    pub y: f64,
}

impl EntityState {
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

/// One authoritative simulation tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub player_states: Vec<EntityState>,
    pub game_seconds: f64,
}

impl StateSnapshot {
    /// Position of the entity at `index` in this snapshot.
    pub fn entity_position(&self, index: usize) -> Result<DVec2, DecodeError> {
        self.player_states
            .get(index)
            .map(EntityState::position)
            .ok_or(DecodeError::MissingEntity {
                index,
                available: self.player_states.len(),
            })
    }
}

/// Serialize an input snapshot into its outbound envelope.
pub fn encode_input(snapshot: InputSnapshot) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&InputEvent { event: snapshot })
}

/// Decode one inbound state message.
pub fn decode_state(payload: &[u8]) -> Result<StateSnapshot, DecodeError> {
    Ok(serde_json::from_slice(payload)?)
}

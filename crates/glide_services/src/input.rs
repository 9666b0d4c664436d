//! Live key state shared between device callbacks and the publisher

use dashmap::DashMap;
use glide_net::{InputSnapshot, InputSource, KeySymbol};
use std::sync::Arc;

/// Pressed-state per key symbol.
///
/// Cheap to clone; clones share the same map. Writers and the publisher
/// never wait on each other for long, and a capture racing a key event just
/// sees that key one tick late.
#[derive(Debug, Clone, Default)]
pub struct KeyStates {
    keys: Arc<DashMap<KeySymbol, bool>>,
}

impl KeyStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down (`true`) or key-up (`false`) event.
    pub fn set(&self, symbol: KeySymbol, pressed: bool) {
        self.keys.insert(symbol, pressed);
    }

    pub fn press(&self, symbol: KeySymbol) {
        self.set(symbol, true);
    }

    pub fn release(&self, symbol: KeySymbol) {
        self.set(symbol, false);
    }

    pub fn is_pressed(&self, symbol: KeySymbol) -> bool {
        self.keys.get(&symbol).map_or(false, |pressed| *pressed)
    }

    /// Copy the current state into an immutable snapshot.
    pub fn snapshot(&self) -> InputSnapshot {
        self.keys
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
    }
}

impl InputSource for KeyStates {
    fn capture(&self) -> InputSnapshot {
        self.snapshot()
    }
}

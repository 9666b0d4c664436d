//! Inbound state consumption
//!
//! Snapshots are taken strictly in arrival order. Nothing is reordered or
//! deduplicated by simulation time, so a late datagram from the transport is
//! appended like any other.

use glide_core::time::Clock;
use tokio::sync::watch;
use tracing::{trace, warn};

use crate::error::{DecodeError, SyncError};
use crate::history::{HistoryBuffer, PositionSample};
use crate::protocol::decode_state;
use crate::transport::StateSource;

/// Owns the sample history and publishes a copy after every ingestion.
pub struct StateIngestor<C> {
    clock: C,
    tracked_entity: usize,
    history: HistoryBuffer,
    updates: watch::Sender<HistoryBuffer>,
}

impl<C: Clock> StateIngestor<C> {
    /// Create an ingestor tracking `player_states[tracked_entity]`, plus the
    /// receiving end the presentation side reads history from.
    pub fn new(clock: C, tracked_entity: usize) -> (Self, watch::Receiver<HistoryBuffer>) {
        let (updates, rx) = watch::channel(HistoryBuffer::new());
        let ingestor = Self {
            clock,
            tracked_entity,
            history: HistoryBuffer::new(),
            updates,
        };
        (ingestor, rx)
    }

    pub fn history(&self) -> HistoryBuffer {
        self.history
    }

    /// Another receiver for the published history.
    pub fn subscribe(&self) -> watch::Receiver<HistoryBuffer> {
        self.updates.subscribe()
    }

    /// Decode one message and append its sample.
    ///
    /// On error the history is left untouched and nothing is published.
    pub fn ingest(&mut self, payload: &[u8]) -> Result<PositionSample, DecodeError> {
        let snapshot = decode_state(payload)?;
        let position = snapshot.entity_position(self.tracked_entity)?;

        let sample = PositionSample::new(position, self.clock.now());
        self.history.push(sample);
        self.updates.send_replace(self.history);

        trace!(
            x = position.x,
            y = position.y,
            game_seconds = snapshot.game_seconds,
            "ingested state snapshot"
        );
        Ok(sample)
    }

    /// Receive and ingest until the source fails.
    ///
    /// Undecodable messages are dropped; only a transport failure ends the loop.
    pub async fn run<S: StateSource>(&mut self, source: &mut S) -> Result<(), SyncError> {
        loop {
            let payload = source.recv().await.map_err(SyncError::Ingest)?;
            if let Err(error) = self.ingest(&payload) {
                warn!(%error, bytes = payload.len(), "dropping state snapshot");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::MemorySource;
    use glide_core::math::DVec2;
    use glide_core::time::ManualClock;
    use std::time::Duration;

    fn snapshot(x: f64, y: f64) -> Vec<u8> {
        format!(r#"{{"player_states": [{{"x": {x}, "y": {y}}}], "game_seconds": 0.0}}"#)
            .into_bytes()
    }

    #[test]
    fn test_samples_use_local_clock() {
        let clock = ManualClock::starting_at(Duration::from_secs(100));
        let (mut ingestor, _rx) = StateIngestor::new(clock.clone(), 0);

        let first = ingestor.ingest(&snapshot(0.0, 0.0)).unwrap();
        clock.advance(Duration::from_secs(1));
        let second = ingestor.ingest(&snapshot(10.0, 0.0)).unwrap();

        assert_eq!(first.received_at, Duration::from_secs(100));
        assert_eq!(second.received_at, Duration::from_secs(101));
        assert_eq!(ingestor.history().pair(), Some((first, second)));
    }

    #[test]
    fn test_keeps_last_two_of_three() {
        let clock = ManualClock::new();
        let (mut ingestor, _rx) = StateIngestor::new(clock.clone(), 0);

        let mut samples = Vec::new();
        for x in [1.0, 2.0, 3.0] {
            clock.advance(Duration::from_secs(1));
            samples.push(ingestor.ingest(&snapshot(x, 0.0)).unwrap());
        }

        let history: Vec<_> = ingestor.history().iter().collect();
        assert_eq!(history, vec![samples[1], samples[2]]);
    }

    #[test]
    fn test_tracks_configured_entity() {
        let (mut ingestor, _rx) = StateIngestor::new(ManualClock::new(), 1);
        let payload =
            br#"{"player_states": [{"x": 1, "y": 1}, {"x": 7, "y": 8}], "game_seconds": 2}"#;

        let sample = ingestor.ingest(payload).unwrap();
        assert_eq!(sample.position, DVec2::new(7.0, 8.0));

        let missing = ingestor.ingest(&snapshot(1.0, 1.0));
        assert!(matches!(missing, Err(DecodeError::MissingEntity { index: 1, available: 1 })));
        assert_eq!(ingestor.history().len(), 1);
    }

    #[test]
    fn test_malformed_message_leaves_history_alone() {
        let (mut ingestor, mut rx) = StateIngestor::new(ManualClock::new(), 0);
        ingestor.ingest(&snapshot(1.0, 2.0)).unwrap();
        let before = ingestor.history();
        rx.mark_unchanged();

        assert!(ingestor.ingest(b"{\"player_states\": ").is_err());
        assert_eq!(ingestor.history(), before);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_every_ingestion_is_published() {
        let (mut ingestor, mut rx) = StateIngestor::new(ManualClock::new(), 0);
        assert!(!rx.has_changed().unwrap());

        ingestor.ingest(&snapshot(4.0, 5.0)).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().latest().map(|s| s.position),
            Some(DVec2::new(4.0, 5.0))
        );
    }

    #[tokio::test]
    async fn test_run_survives_malformed_message() {
        let clock = ManualClock::new();
        let (mut ingestor, rx) = StateIngestor::new(clock, 0);
        let (host, mut source) = MemorySource::new(8);

        host.send(snapshot(1.0, 0.0)).await.unwrap();
        host.send(b"\xff\xfe garbage".to_vec()).await.unwrap();
        host.send(snapshot(2.0, 0.0)).await.unwrap();
        drop(host);

        let result = ingestor.run(&mut source).await;
        assert!(matches!(result, Err(SyncError::Ingest(TransportError::Closed))));

        let positions: Vec<_> = rx.borrow().iter().map(|s| s.position.x).collect();
        assert_eq!(positions, vec![1.0, 2.0]);
    }
}

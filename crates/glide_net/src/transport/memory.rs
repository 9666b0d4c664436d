//! In-process channels over bounded mpsc queues

use tokio::sync::mpsc;

use super::{InputSink, StateSource};
use crate::error::TransportError;

/// Sink whose messages land in an mpsc receiver.
#[derive(Debug)]
pub struct MemorySink {
    tx: mpsc::Sender<Vec<u8>>,
}

impl MemorySink {
    /// Create a sink and the receiving end a host reads from.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Vec<u8>>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl InputSink for MemorySink {
    async fn send(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        self.tx
            .send(payload.to_vec())
            .await
            .map_err(|_| TransportError::Closed)
    }

    async fn close(self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Source fed from an mpsc sender.
#[derive(Debug)]
pub struct MemorySource {
    rx: mpsc::Receiver<Vec<u8>>,
}

impl MemorySource {
    /// Create a source and the sending end a host publishes into.
    pub fn new(capacity: usize) -> (mpsc::Sender<Vec<u8>>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx })
    }
}

impl StateSource for MemorySource {
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        self.rx.recv().await.ok_or(TransportError::Closed)
    }

    async fn close(mut self) -> Result<(), TransportError> {
        self.rx.close();
        Ok(())
    }
}

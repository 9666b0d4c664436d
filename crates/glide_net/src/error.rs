//! Error types for glide_net

use thiserror::Error;

/// Failure of a transport channel.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The channel is gone; nothing more will be sent or received on it.
    #[error("channel closed")]
    Closed,

    /// Socket-level failure
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Whether a failed send should end the session.
    ///
    /// Only a closed channel is fatal for sends; a failed datagram is
    /// reported and the next tick tries again.
    pub fn is_fatal_for_send(&self) -> bool {
        matches!(self, TransportError::Closed)
    }
}

/// A state snapshot that could not be turned into a position sample.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed state snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("snapshot has no entity at index {index} ({available} present)")]
    MissingEntity { index: usize, available: usize },
}

/// Failure that ends a sync session.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Outbound input channel failed
    #[error("input channel failed: {0}")]
    Publish(#[source] TransportError),

    /// Inbound state channel failed
    #[error("state channel failed: {0}")]
    Ingest(#[source] TransportError),

    /// Could not open a channel to the host
    #[error("could not connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: TransportError,
    },

    /// Input envelope could not be serialized
    #[error("could not encode input: {0}")]
    Encode(#[source] serde_json::Error),

    /// Background runtime could not be started
    #[error("could not start sync runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The sync thread panicked
    #[error("sync thread panicked")]
    Panicked,
}

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

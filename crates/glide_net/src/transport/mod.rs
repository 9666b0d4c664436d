//! Message channels to the simulation host
//!
//! Input goes out on an [`InputSink`], state comes in from a [`StateSource`].
//! Both are message-delimited: one `send` is one message, one `recv` yields
//! one message. Delivery is unreliable and acknowledgements never come back.

mod memory;
mod udp;

pub use memory::{MemorySink, MemorySource};
pub use udp::{UdpInputSink, UdpStateSource, MAX_DATAGRAM};

use std::future::Future;

use crate::error::TransportError;

/// Outbound channel carrying input envelopes.
pub trait InputSink: Send {
    /// Hand one message to the channel. Resolves once the channel accepted it.
    fn send(&mut self, payload: &[u8]) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Close the channel.
    fn close(self) -> impl Future<Output = Result<(), TransportError>> + Send
    where
        Self: Sized;
}

/// Inbound channel carrying state snapshots.
pub trait StateSource: Send {
    /// Wait for the next message. This is where the receive loop parks.
    fn recv(&mut self) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;

    /// Close the channel.
    fn close(self) -> impl Future<Output = Result<(), TransportError>> + Send
    where
        Self: Sized;
}

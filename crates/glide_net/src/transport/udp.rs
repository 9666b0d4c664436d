//! Datagram channels
//!
//! Each channel is a connected UDP socket: one message per datagram, no
//! retransmission, no acknowledgement. The state channel announces itself to
//! the host with a single [`SUBSCRIBE`] datagram; after that it receives
//! whatever the host publishes.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, info};

use super::{InputSink, StateSource};
use crate::error::TransportError;
use crate::protocol::SUBSCRIBE;

/// Largest datagram the state channel accepts.
pub const MAX_DATAGRAM: usize = 64 * 1024;

/// Outbound input channel over UDP.
#[derive(Debug)]
pub struct UdpInputSink {
    socket: UdpSocket,
}

impl UdpInputSink {
    /// Open a datagram channel to `addr` (`host:port`).
    pub async fn connect(addr: &str) -> Result<Self, TransportError> {
        let sink = Self {
            socket: connected_socket(addr).await?,
        };
        info!(%addr, local = ?sink.local_addr().ok(), "input channel connected");
        Ok(sink)
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.socket.local_addr()?)
    }
}

impl InputSink for UdpInputSink {
    async fn send(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        self.socket.send(payload).await?;
        Ok(())
    }

    async fn close(self) -> Result<(), TransportError> {
        debug!("input channel closed");
        Ok(())
    }
}

/// Inbound state channel over UDP.
#[derive(Debug)]
pub struct UdpStateSource {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl UdpStateSource {
    /// Open a datagram channel to `addr` (`host:port`) and subscribe to
    /// everything the host publishes.
    pub async fn subscribe(addr: &str) -> Result<Self, TransportError> {
        let socket = connected_socket(addr).await?;
        socket.send(SUBSCRIBE).await?;
        let source = Self {
            socket,
            buf: vec![0; MAX_DATAGRAM],
        };
        info!(%addr, local = ?source.local_addr().ok(), "state channel subscribed");
        Ok(source)
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.socket.local_addr()?)
    }
}

impl StateSource for UdpStateSource {
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        let len = self.socket.recv(&mut self.buf).await?;
        Ok(self.buf[..len].to_vec())
    }

    async fn close(self) -> Result<(), TransportError> {
        debug!("state channel closed");
        Ok(())
    }
}

/// Bind an ephemeral socket in the remote's address family and connect it.
async fn connected_socket(addr: &str) -> Result<UdpSocket, TransportError> {
    let remote = lookup_host(addr).await?.next().ok_or_else(|| {
        TransportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{addr} did not resolve to any address"),
        ))
    })?;

    let local: SocketAddr = if remote.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };

    let socket = UdpSocket::bind(local).await?;
    socket.connect(remote).await?;
    Ok(socket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_then_receive() {
        let host = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let host_addr = host.local_addr().unwrap().to_string();

        let mut source = UdpStateSource::subscribe(&host_addr).await.unwrap();

        let mut buf = [0u8; 16];
        let (len, subscriber) = host.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], SUBSCRIBE);
        assert_eq!(subscriber.port(), source.local_addr().unwrap().port());

        host.send_to(b"state", subscriber).await.unwrap();
        assert_eq!(source.recv().await.unwrap(), b"state");
    }

    #[tokio::test]
    async fn test_sink_sends_one_datagram_per_message() {
        let host = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let host_addr = host.local_addr().unwrap().to_string();

        let mut sink = UdpInputSink::connect(&host_addr).await.unwrap();
        sink.send(b"first").await.unwrap();
        sink.send(b"second").await.unwrap();

        let mut buf = [0u8; 16];
        let (len, peer) = host.recv_from(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"first");
        assert_eq!(peer.port(), sink.local_addr().unwrap().port());
        let len = host.recv(&mut buf).await.unwrap();
        assert_eq!(&buf[..len], b"second");
    }

    #[tokio::test]
    async fn test_unresolvable_address_fails() {
        assert!(UdpInputSink::connect("not an address").await.is_err());
    }
}

//! Background session lifecycle
//!
//! The sync loop runs on its own thread with a single-threaded tokio
//! runtime, independent of whatever schedule the render loop keeps. The
//! render side only touches the [`RenderView`] it gets back.

use std::thread::{self, JoinHandle};

use glide_core::time::Clock;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::ingestor::StateIngestor;
use crate::publisher::{InputPublisher, InputSource};
use crate::sync_loop::SyncLoop;
use crate::transport::{UdpInputSink, UdpStateSource};
use crate::view::RenderView;

/// A running sync session.
///
/// Dropping the session asks the loop to stop without waiting for it.
pub struct SyncSession {
    view: RenderView,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<Result<()>>>,
}

impl SyncSession {
    /// Connect to the host described by `config` and start syncing on a
    /// background thread.
    ///
    /// Connection failures surface through [`SyncSession::shutdown`] like any
    /// other session failure.
    pub fn spawn<I, C>(config: SyncConfig, input: I, clock: C) -> Result<Self>
    where
        I: InputSource + 'static,
        C: Clock + 'static,
    {
        let publisher = InputPublisher::with_rate(input, config.publish_rate_hz);
        let (ingestor, _) = StateIngestor::new(clock, config.tracked_entity);
        let (sync, updates) = SyncLoop::new(publisher, ingestor, config.linger());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let thread = thread::Builder::new()
            .name("glide-sync".to_string())
            .spawn(move || -> Result<()> {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(SyncError::Runtime)?;
                runtime.block_on(connect_and_run(config, sync, shutdown_rx))
            })
            .map_err(SyncError::Runtime)?;

        info!("sync session started");
        Ok(Self {
            view: RenderView::new(updates),
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    pub fn view(&self) -> &RenderView {
        &self.view
    }

    /// The presentation handle; call [`RenderView::tick`] on it every frame.
    pub fn view_mut(&mut self) -> &mut RenderView {
        &mut self.view
    }

    /// Whether the loop has ended on its own (a failure) or after shutdown.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop the loop, wait for it, and return how it ended.
    pub fn shutdown(mut self) -> Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        let result = thread.join().map_err(|_| SyncError::Panicked)?;
        debug!(ok = result.is_ok(), "sync session joined");
        result
    }
}

/// Open both channels, then hand them to the loop until `shutdown` fires.
async fn connect_and_run<I, C>(
    config: SyncConfig,
    sync: SyncLoop<I, C>,
    shutdown: oneshot::Receiver<()>,
) -> Result<()>
where
    I: InputSource,
    C: Clock,
{
    let sink = UdpInputSink::connect(&config.input_addr)
        .await
        .map_err(|source| SyncError::Connect {
            addr: config.input_addr.clone(),
            source,
        })?;
    let source = UdpStateSource::subscribe(&config.state_addr)
        .await
        .map_err(|source| SyncError::Connect {
            addr: config.state_addr.clone(),
            source,
        })?;

    sync.run(sink, source, async move {
        // a dropped sender also means stop
        let _ = shutdown.await;
    })
    .await
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{InputEvent, InputSnapshot, SUBSCRIBE};
    use glide_core::math::DVec2;
    use glide_core::time::SystemClock;
    use std::net::UdpSocket;
    use std::time::{Duration, Instant};

    #[test]
    fn test_session_over_loopback() {
        let host_state = UdpSocket::bind("127.0.0.1:0").unwrap();
        let host_input = UdpSocket::bind("127.0.0.1:0").unwrap();
        host_state.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        host_input.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

        let config = SyncConfig {
            input_addr: host_input.local_addr().unwrap().to_string(),
            state_addr: host_state.local_addr().unwrap().to_string(),
            ..SyncConfig::default()
        };
        let input = || -> InputSnapshot { [(87, true)].into_iter().collect() };
        let mut session = SyncSession::spawn(config, input, SystemClock::new()).unwrap();

        let mut buf = [0u8; 1024];
        let (len, subscriber) = host_state.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], SUBSCRIBE);

        let len = host_input.recv(&mut buf).unwrap();
        let envelope: InputEvent = serde_json::from_slice(&buf[..len]).unwrap();
        assert!(envelope.event.is_pressed(87));

        let state = br#"{"player_states": [{"x": 3, "y": 4}], "game_seconds": 1.0}"#;
        let deadline = Instant::now() + Duration::from_secs(5);
        while session.view().raw_position().is_none() {
            assert!(Instant::now() < deadline, "no state reached the view");
            host_state.send_to(state, subscriber).unwrap();
            thread::sleep(Duration::from_millis(10));
            session.view_mut().tick(Duration::from_millis(10));
        }
        assert_eq!(session.view().raw_position(), Some(DVec2::new(3.0, 4.0)));

        assert!(!session.is_finished());
        session.shutdown().unwrap();
    }

    #[test]
    fn test_bad_address_surfaces_on_shutdown() {
        let config = SyncConfig {
            input_addr: "definitely not an address".to_string(),
            ..SyncConfig::default()
        };
        let session = SyncSession::spawn(config, InputSnapshot::default, SystemClock::new()).unwrap();

        let result = session.shutdown();
        assert!(matches!(result, Err(SyncError::Connect { .. })));
    }
}

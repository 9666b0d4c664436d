//! Fixed-rate input publishing
//!
//! Every tick captures the live key state and fires one envelope at the host.
//! The sleep between ticks starts after the send, so slow sends stretch the
//! cadence; that drift is accepted rather than corrected.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::error::SyncError;
use crate::protocol::{encode_input, InputSnapshot};
use crate::transport::InputSink;

/// Where the publisher reads the current key state from.
pub trait InputSource: Send + Sync {
    fn capture(&self) -> InputSnapshot;
}

impl<F> InputSource for F
where
    F: Fn() -> InputSnapshot + Send + Sync,
{
    fn capture(&self) -> InputSnapshot {
        self()
    }
}

/// Sends the captured input state at a fixed rate.
pub struct InputPublisher<I> {
    input: I,
    period: Duration,
}

impl<I: InputSource> InputPublisher<I> {
    pub fn new(input: I, period: Duration) -> Self {
        Self { input, period }
    }

    /// Publisher running at `rate_hz` ticks per second.
    pub fn with_rate(input: I, rate_hz: u32) -> Self {
        Self::new(input, Duration::from_secs_f64(1.0 / rate_hz.max(1) as f64))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Capture and encode one tick's envelope.
    pub fn envelope(&self) -> Result<Vec<u8>, SyncError> {
        encode_input(self.input.capture()).map_err(SyncError::Encode)
    }

    /// Publish until `stop` flips (or its sender is dropped) or the sink closes.
    ///
    /// `stop` is only observed between ticks: a send already under way is
    /// allowed to finish.
    pub async fn run<S: InputSink>(
        &self,
        sink: &mut S,
        mut stop: watch::Receiver<bool>,
    ) -> Result<(), SyncError> {
        debug!(period = ?self.period, "input publisher started");
        let mut ticks: u64 = 0;

        loop {
            if *stop.borrow_and_update() {
                break;
            }

            let envelope = self.envelope()?;
            match sink.send(&envelope).await {
                Ok(()) => trace!(tick = ticks, bytes = envelope.len(), "input sent"),
                Err(error) if error.is_fatal_for_send() => return Err(SyncError::Publish(error)),
                Err(error) => warn!(%error, tick = ticks, "input send failed"),
            }
            ticks += 1;

            tokio::select! {
                _ = tokio::time::sleep(self.period) => {}
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        debug!(ticks, "input publisher stopped");
        Ok(())
    }
}

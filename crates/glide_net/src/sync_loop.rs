//! Duplex messaging loop
//!
//! Publishing and ingesting progress side by side on one task. Neither
//! waits on the other: a silent host does not hold up input, and idle input
//! does not hold up state.

use std::future::Future;
use std::time::Duration;

use glide_core::time::Clock;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::error::SyncError;
use crate::history::HistoryBuffer;
use crate::ingestor::StateIngestor;
use crate::publisher::{InputPublisher, InputSource};
use crate::transport::{InputSink, StateSource};

/// Which side ended the loop.
enum Exit {
    Publisher(Result<(), SyncError>),
    Ingestor(Result<(), SyncError>),
    Shutdown,
}

pub struct SyncLoop<I, C> {
    publisher: InputPublisher<I>,
    ingestor: StateIngestor<C>,
    linger: Duration,
}

impl<I: InputSource, C: Clock> SyncLoop<I, C> {
    /// Returns the loop and the history receiver for the render side.
    pub fn new(
        publisher: InputPublisher<I>,
        ingestor: StateIngestor<C>,
        linger: Duration,
    ) -> (Self, watch::Receiver<HistoryBuffer>) {
        let updates = ingestor.subscribe();
        let sync = Self {
            publisher,
            ingestor,
            linger,
        };
        (sync, updates)
    }

    /// Run both activities until `shutdown` resolves or one of them fails.
    ///
    /// On shutdown the receive is abandoned at once while an in-flight send
    /// gets up to `linger` to complete. Both channels are closed before
    /// returning. A failure on either side cancels the other and is returned.
    pub async fn run<S, R>(
        mut self,
        mut sink: S,
        mut source: R,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), SyncError>
    where
        S: InputSink,
        R: StateSource,
    {
        info!(period = ?self.publisher.period(), "sync loop started");
        let (stop_tx, stop_rx) = watch::channel(false);

        let result = {
            let publish = self.publisher.run(&mut sink, stop_rx);
            let ingest = self.ingestor.run(&mut source);
            tokio::pin!(publish, ingest, shutdown);

            let exit = tokio::select! {
                result = &mut publish => Exit::Publisher(result),
                result = &mut ingest => Exit::Ingestor(result),
                _ = &mut shutdown => Exit::Shutdown,
            };

            match exit {
                Exit::Publisher(result) => result,
                Exit::Ingestor(result) => result,
                Exit::Shutdown => {
                    let _ = stop_tx.send(true);
                    match tokio::time::timeout(self.linger, &mut publish).await {
                        Ok(result) => result,
                        Err(_) => {
                            warn!(linger = ?self.linger, "in-flight send abandoned");
                            Ok(())
                        }
                    }
                }
            }
        };

        if let Err(error) = sink.close().await {
            warn!(%error, "closing input channel failed");
        }
        if let Err(error) = source.close().await {
            warn!(%error, "closing state channel failed");
        }

        match &result {
            Ok(()) => info!("sync loop stopped"),
            Err(error) => error!(%error, "sync loop failed"),
        }
        result
    }
}

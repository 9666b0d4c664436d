//! Presentation boundary
//!
//! The render loop owns a [`RenderView`] and calls [`RenderView::tick`] once
//! per frame. History arrives through a latest-value channel; whenever a new
//! value is seen the predictor re-anchors at what was last drawn.

use glide_core::math::DVec2;
use std::time::Duration;
use tokio::sync::watch;

use crate::history::HistoryBuffer;
use crate::predictor::PositionPredictor;

pub struct RenderView {
    updates: watch::Receiver<HistoryBuffer>,
    history: HistoryBuffer,
    predictor: PositionPredictor,
    connected: bool,
}

impl RenderView {
    pub fn new(updates: watch::Receiver<HistoryBuffer>) -> Self {
        Self::with_position(updates, DVec2::ZERO)
    }

    pub fn with_position(updates: watch::Receiver<HistoryBuffer>, initial: DVec2) -> Self {
        Self {
            updates,
            history: HistoryBuffer::new(),
            predictor: PositionPredictor::new(initial),
            connected: true,
        }
    }

    /// Advance one frame of `dt` and return the position to draw.
    ///
    /// Never blocks. Once the ingesting side is gone the position stays frozen.
    pub fn tick(&mut self, dt: Duration) -> DVec2 {
        if !self.connected {
            return self.predictor.position();
        }

        match self.updates.has_changed() {
            Ok(true) => {
                self.history = *self.updates.borrow_and_update();
                self.predictor.latch();
            }
            Ok(false) => {}
            Err(_) => {
                // the sender is gone but its final value may still be unseen
                let last = self.updates.borrow_and_update();
                if last.has_changed() {
                    self.history = *last;
                }
                self.connected = false;
                return self.predictor.position();
            }
        }

        self.predictor.advance(&self.history, dt)
    }

    /// Current predicted position.
    pub fn position(&self) -> DVec2 {
        self.predictor.position()
    }

    /// Latest authoritative position, without prediction.
    pub fn raw_position(&self) -> Option<DVec2> {
        self.history.latest().map(|sample| sample.position)
    }

    /// History as of the last tick.
    pub fn history(&self) -> HistoryBuffer {
        self.history
    }

    /// False once the ingesting side has shut down.
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

//! Two most recent position samples

use glide_core::math::DVec2;
use std::time::Duration;

/// Tracked position together with the local clock reading at receipt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    pub position: DVec2,
    /// Local clock reading when the snapshot was ingested, not simulation time
    pub received_at: Duration,
}

impl PositionSample {
    pub fn new(position: DVec2, received_at: Duration) -> Self {
        Self {
            position,
            received_at,
        }
    }
}

/// FIFO of at most two samples, oldest first.
///
/// Plain `Copy` data: the ingestor publishes whole copies, readers never
/// share it mutably.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistoryBuffer {
    older: Option<PositionSample>,
    newer: Option<PositionSample>,
}

impl HistoryBuffer {
    pub const CAPACITY: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample, evicting the oldest when full.
    pub fn push(&mut self, sample: PositionSample) {
        if self.newer.is_some() {
            self.older = self.newer.take();
        }
        self.newer = Some(sample);
    }

    pub fn len(&self) -> usize {
        self.older.is_some() as usize + self.newer.is_some() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.newer.is_none()
    }

    /// Most recently ingested sample.
    pub fn latest(&self) -> Option<PositionSample> {
        self.newer
    }

    /// `(older, newer)` once two samples have been seen.
    pub fn pair(&self) -> Option<(PositionSample, PositionSample)> {
        Some((self.older?, self.newer?))
    }

    /// Samples oldest first.
    pub fn iter(&self) -> impl Iterator<Item = PositionSample> {
        self.older.into_iter().chain(self.newer)
    }
}

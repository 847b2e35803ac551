// =============================================================================
// CandleStore — fixed-capacity rolling window of recent candles
// =============================================================================
//
// Single-writer (the acquisition loop) / multi-reader buffer. A
// `parking_lot::RwLock` around the `VecDeque` guarantees readers never see a
// torn window: `replace` swaps the whole contents inside one write-lock
// section, and `snapshot` clones under the read lock.
//
// Ingestion policy (documented, applied consistently):
//   - A candle whose timestamp is not strictly greater than the current tail
//     is logged and SKIPPED — it never overwrites an existing entry.
//   - Candles with any non-finite field are logged and skipped, so NaN can
//     never reach the indicator pipeline.
// =============================================================================

use std::collections::VecDeque;

use parking_lot::RwLock;
use tracing::warn;

use crate::types::Candle;

pub struct CandleStore {
    window: RwLock<VecDeque<Candle>>,
    capacity: usize,
}

impl CandleStore {
    /// Create a store that retains at most `capacity` candles.
    pub fn new(capacity: usize) -> Self {
        Self {
            window: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Atomically swap the entire window contents.
    ///
    /// Used by the full-refresh acquisition path. The incoming batch is
    /// sanitized first (outside the lock): non-finite candles and entries
    /// that do not strictly advance the timestamp are dropped with a warning.
    /// Only the most recent `capacity` survivors are kept.
    pub fn replace(&self, candles: Vec<Candle>) {
        let mut sane: VecDeque<Candle> = VecDeque::with_capacity(self.capacity);
        for candle in candles {
            if !candle.is_finite() {
                warn!(timestamp = candle.timestamp, "dropping candle with non-finite field");
                continue;
            }
            if let Some(last) = sane.back() {
                if candle.timestamp <= last.timestamp {
                    warn!(
                        timestamp = candle.timestamp,
                        tail = last.timestamp,
                        "dropping out-of-order candle in refresh batch"
                    );
                    continue;
                }
            }
            sane.push_back(candle);
            if sane.len() > self.capacity {
                sane.pop_front();
            }
        }

        *self.window.write() = sane;
    }

    /// Insert one candle, evicting the oldest entry at capacity.
    ///
    /// Returns `true` when the candle was accepted. Rejections (non-finite
    /// fields, timestamp not strictly greater than the tail) are logged and
    /// skipped per the ingestion policy above.
    pub fn append(&self, candle: Candle) -> bool {
        if !candle.is_finite() {
            warn!(timestamp = candle.timestamp, "rejecting candle with non-finite field");
            return false;
        }

        let mut window = self.window.write();
        if let Some(last) = window.back() {
            if candle.timestamp <= last.timestamp {
                warn!(
                    timestamp = candle.timestamp,
                    tail = last.timestamp,
                    "rejecting non-increasing candle timestamp"
                );
                return false;
            }
        }

        window.push_back(candle);
        while window.len() > self.capacity {
            window.pop_front();
        }
        true
    }

    /// Isolated copy of the current window, oldest first.
    ///
    /// Safe to iterate while the acquisition loop keeps mutating the store;
    /// indicator math always runs on a snapshot with no lock held.
    pub fn snapshot(&self) -> Vec<Candle> {
        self.window.read().iter().cloned().collect()
    }

    /// The most recent candle, if any.
    pub fn last(&self) -> Option<Candle> {
        self.window.read().back().cloned()
    }

    pub fn len(&self) -> usize {
        self.window.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.read().is_empty()
    }
}

//! Bounded rolling price history.
//!
//! One `PriceHistoryBuffer` per symbol, append-only, oldest point evicted at
//! capacity. Analytical engines never touch the live buffer: they work on
//! `snapshot()` copies, so appends and computations stay serialized without
//! the engines needing any locking of their own.

use crate::types::PricePoint;
use dashmap::DashMap;
use std::collections::VecDeque;

/// Bounded append-only ring buffer of OHLC observations.
#[derive(Debug)]
pub struct PriceHistoryBuffer {
    points: VecDeque<PricePoint>,
    capacity: usize,
}

impl PriceHistoryBuffer {
    /// Create a buffer holding at most `capacity` points.
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting the oldest at capacity.
    pub fn push(&mut self, point: PricePoint) {
        if self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Latest close price, if any.
    pub fn latest_close(&self) -> Option<f64> {
        self.points.back().map(|p| p.close)
    }

    /// Timestamp of the latest point, if any.
    pub fn latest_time(&self) -> Option<i64> {
        self.points.back().map(|p| p.time)
    }

    /// Immutable copy of the current contents, oldest first.
    ///
    /// Computations run against the copy; the live buffer is free to accept
    /// appends in the meantime.
    pub fn snapshot(&self) -> Vec<PricePoint> {
        self.points.iter().copied().collect()
    }
}

/// Per-symbol buffer store, keyed by lowercase symbol.
pub struct HistoryStore {
    buffers: DashMap<String, PriceHistoryBuffer>,
    capacity: usize,
}

impl HistoryStore {
    /// Create a store whose buffers hold at most `capacity` points.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffers: DashMap::new(),
            capacity,
        }
    }

    /// Append a tick for a symbol, creating the buffer on first use.
    /// Returns the number of points now held.
    pub fn append(&self, symbol: &str, point: PricePoint) -> usize {
        let mut entry = self
            .buffers
            .entry(symbol.to_lowercase())
            .or_insert_with(|| PriceHistoryBuffer::new(self.capacity));
        entry.push(point);
        entry.len()
    }

    /// Snapshot a symbol's history; empty when the symbol is unknown.
    pub fn snapshot(&self, symbol: &str) -> Vec<PricePoint> {
        self.buffers
            .get(&symbol.to_lowercase())
            .map(|b| b.snapshot())
            .unwrap_or_default()
    }

    /// Latest close for a symbol, if any.
    pub fn latest_close(&self, symbol: &str) -> Option<f64> {
        self.buffers
            .get(&symbol.to_lowercase())
            .and_then(|b| b.latest_close())
    }

    /// Number of points held for a symbol.
    pub fn len(&self, symbol: &str) -> usize {
        self.buffers
            .get(&symbol.to_lowercase())
            .map(|b| b.len())
            .unwrap_or(0)
    }
}

//! Rolling buffer of the bars the engine evaluates

use crate::models::bar::Bar;

/// Default number of bars kept
pub const DEFAULT_MAX_BARS: usize = 1000;

/// Time-ascending, bounded bar buffer with unique timestamps.
#[derive(Debug, Clone)]
pub struct BarBuffer {
    bars: Vec<Bar>,
    capacity: usize,
}

impl BarBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            bars: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Fold freshly fetched bars into the buffer.
    ///
    /// An empty buffer adopts the batch as-is (sorted, deduplicated). After
    /// that, newer bars are appended, a bar matching the newest timestamp
    /// replaces it (the in-progress candle), and older bars are ignored.
    /// Returns the number of bars appended.
    pub fn merge(&mut self, mut fetched: Vec<Bar>) -> usize {
        fetched.sort_by_key(|b| b.time);

        if self.bars.is_empty() {
            fetched.dedup_by_key(|b| b.time);
            self.bars = fetched;
            self.evict_overflow();
            return self.bars.len();
        }

        let mut appended = 0;
        for bar in fetched {
            let Some(last) = self.bars.last_mut() else {
                self.bars.push(bar);
                appended += 1;
                continue;
            };
            if bar.time > last.time {
                self.bars.push(bar);
                appended += 1;
            } else if bar.time == last.time {
                *last = bar;
            }
        }
        self.evict_overflow();
        appended
    }

    /// Whether merging `fetched` would skip bars after the newest buffered one.
    ///
    /// True when the oldest fetched bar past the buffer's end starts more than
    /// one `interval_ms` after it, e.g. after a run of failed polls.
    pub fn leaves_gap(&self, fetched: &[Bar], interval_ms: i64) -> bool {
        let Some(last) = self.bars.last() else {
            return false;
        };
        fetched
            .iter()
            .map(|b| b.time)
            .filter(|&t| t > last.time)
            .min()
            .is_some_and(|next| next - last.time > interval_ms)
    }

    /// Drop everything buffered and adopt `fetched` as a fresh window.
    pub fn replace(&mut self, fetched: Vec<Bar>) -> usize {
        self.bars.clear();
        self.merge(fetched)
    }

    fn evict_overflow(&mut self) {
        if self.bars.len() > self.capacity {
            let excess = self.bars.len() - self.capacity;
            self.bars.drain(..excess);
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for BarBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BARS)
    }
}

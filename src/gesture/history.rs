use std::collections::VecDeque;

use crate::orientation::Orientation;

/// Orientation at a point in sensor time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationSample {
    /// Monotonic sensor clock in nanoseconds
    pub timestamp_ns: i64,
    pub orientation: Orientation,
}

impl OrientationSample {
    pub fn new(timestamp_ns: i64, orientation: Orientation) -> Self {
        Self {
            timestamp_ns,
            orientation,
        }
    }
}

/// Time-windowed orientation history
///
/// Samples are kept oldest first. Every push evicts the samples that are more
/// than `window_ns` older than the pushed one, so the history never spans
/// more than one retention window.
#[derive(Debug, Clone)]
pub struct OrientationHistory {
    samples: VecDeque<OrientationSample>,
    window_ns: i64,
}

impl OrientationHistory {
    pub fn new(window_ns: i64) -> Self {
        Self {
            samples: VecDeque::with_capacity(256),
            window_ns,
        }
    }

    /// Append `sample` and evict everything outside the window.
    ///
    /// The caller must not push a sample older than [`Self::newest`]; the
    /// history relies on insertion order being time order. Returns the number
    /// of samples evicted.
    pub fn push(&mut self, sample: OrientationSample) -> usize {
        debug_assert!(
            self.newest()
                .is_none_or(|n| n.timestamp_ns <= sample.timestamp_ns),
            "orientation samples must arrive in time order"
        );
        self.samples.push_back(sample);
        self.evict(sample.timestamp_ns)
    }

    /// Drop the leading samples older than `now_ns - window`.
    pub fn evict(&mut self, now_ns: i64) -> usize {
        let mut evicted = 0;
        while let Some(oldest) = self.samples.front() {
            if now_ns.saturating_sub(oldest.timestamp_ns) > self.window_ns {
                self.samples.pop_front();
                evicted += 1;
            } else {
                break;
            }
        }
        evicted
    }

    pub fn newest(&self) -> Option<&OrientationSample> {
        self.samples.back()
    }

    pub fn oldest(&self) -> Option<&OrientationSample> {
        self.samples.front()
    }

    /// Samples from newest to oldest
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &OrientationSample> {
        self.samples.iter().rev()
    }

    /// Samples in time order (oldest to newest)
    pub fn iter(&self) -> impl Iterator<Item = &OrientationSample> {
        self.samples.iter()
    }

    pub fn window_ns(&self) -> i64 {
        self.window_ns
    }

    /// Time covered by the retained samples
    pub fn span_ns(&self) -> i64 {
        match (self.oldest(), self.newest()) {
            (Some(oldest), Some(newest)) => newest.timestamp_ns.saturating_sub(oldest.timestamp_ns),
            _ => 0,
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

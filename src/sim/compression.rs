//! Rolling window of per-tick compression samples
//!
//! The loss check runs on the median of this window rather than on the raw
//! per-tick value, so a single crowded tick cannot end the game.

use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub struct CompressionWindow {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl CompressionWindow {
    /// A window of `capacity` zeros
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: std::iter::repeat_n(0.0, capacity).collect(),
            capacity,
        }
    }

    /// Restore from saved samples, oldest first
    ///
    /// Keeps the newest `capacity` values; a short history is padded with
    /// zeros at the old end.
    pub fn from_values(values: &[f32], capacity: usize) -> Self {
        let mut window = Self::new(capacity);
        let start = values.len().saturating_sub(window.capacity);
        for &v in &values[start..] {
            window.push(v);
        }
        window
    }

    /// Append the newest sample and drop the oldest
    pub fn push(&mut self, value: f32) {
        self.samples.push_back(value);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Middle element of the sorted window (upper median for even sizes)
    pub fn median(&self) -> f32 {
        let mut sorted: Vec<f32> = self.samples.iter().copied().collect();
        sorted.sort_by(f32::total_cmp);
        sorted[sorted.len() / 2]
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.capacity);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples, oldest first
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }
}

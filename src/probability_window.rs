use std::collections::VecDeque;

/// Sliding window over the most recent classification probabilities of one
/// camera.
///
/// The window reports [`is_full`](Self::is_full) once it holds exactly
/// `capacity` samples. Changing the capacity never touches the samples
/// already held; it only moves the point at which the window counts as
/// full, and the next [`push`](Self::push) trims from the front.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityWindow {
    capacity: usize,
    samples: VecDeque<f32>,
}

impl ProbabilityWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
    }

    /// Appends `value`, first discarding the oldest samples until at most
    /// `capacity - 1` remain.
    pub fn push(&mut self, value: f32) {
        if self.samples.len() >= self.capacity {
            let excess = self.samples.len() - self.capacity + 1;
            self.samples.drain(..excess);
        }
        self.samples.push_back(value);
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Mean of the samples currently held, `0.0` when empty. Only an alert
    /// signal once the window is full.
    pub fn average(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.samples.iter().map(|&p| p as f64).sum();
        (sum / self.samples.len() as f64) as f32
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[cfg(test)]
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }
}

// Majority-vote smoothing over the most recent emotion labels

use std::collections::VecDeque;

/// Default number of labels kept in the window
pub const DEFAULT_WINDOW: usize = 10;

/// Fixed-capacity history of recent labels; the oldest label is evicted
/// first once the window is full.
#[derive(Clone, Debug)]
pub struct EmotionHistory {
    labels: VecDeque<String>,
    capacity: usize,
}

impl EmotionHistory {
    /// Creates an empty history. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            labels: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records `label`. Empty labels ("no detection") leave the history alone.
    pub fn observe(&mut self, label: &str) {
        if label.is_empty() {
            return;
        }
        if self.labels.len() == self.capacity {
            self.labels.pop_front();
        }
        self.labels.push_back(label.to_string());
    }

    /// Most frequent label in the window.
    ///
    /// Ties go to the label whose first occurrence in the current window is
    /// oldest, so the same input sequence always yields the same answer.
    pub fn majority_label(&self) -> Option<&str> {
        // (label, count) in first-seen order
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for label in &self.labels {
            match counts.iter_mut().find(|(seen, _)| *seen == label.as_str()) {
                Some((_, count)) => *count += 1,
                None => counts.push((label.as_str(), 1)),
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (label, count) in counts {
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Labels oldest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for EmotionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

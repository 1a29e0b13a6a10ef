//! Recent frequency history and majority vote

use heapless::HistoryBuffer;

/// Ring of the last `K` detected frequencies; new entries overwrite the oldest
pub struct FrequencyHistory<const K: usize> {
    ring: HistoryBuffer<u16, K>,
}

impl<const K: usize> FrequencyHistory<K> {
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuffer::new(),
        }
    }

    pub fn push(&mut self, frequency: u16) {
        self.ring.write(frequency);
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.len() == 0
    }

    /// Most recent frequency
    pub fn latest(&self) -> Option<u16> {
        self.ring.recent().copied()
    }

    /// Majority over the `window` most recent entries
    ///
    /// Missing entries count as votes against every candidate, so a partly
    /// filled history only yields a majority of the full window.
    pub fn majority(&self, window: usize) -> Option<u16> {
        let window = window.min(K);
        let mut recent = [0u16; K];
        let mut count = 0;
        for &frequency in self.ring.oldest_ordered() {
            recent[count] = frequency;
            count += 1;
        }
        let start = count.saturating_sub(window);
        let candidate = majority_vote(&recent[start..count])?;
        let votes = recent[start..count].iter().filter(|&&f| f == candidate).count();
        (votes > window / 2).then_some(candidate)
    }
}

impl<const K: usize> Default for FrequencyHistory<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Boyer-Moore majority vote
///
/// Returns the value occupying more than half of `values`, if there is one.
pub fn majority_vote(values: &[u16]) -> Option<u16> {
    let mut candidate = *values.first()?;
    let mut votes = 0usize;
    for &value in values {
        if votes == 0 {
            candidate = value;
            votes = 1;
        } else if value == candidate {
            votes += 1;
        } else {
            votes -= 1;
        }
    }

    // second pass confirms the candidate
    let count = values.iter().filter(|&&value| value == candidate).count();
    (count > values.len() / 2).then_some(candidate)
}

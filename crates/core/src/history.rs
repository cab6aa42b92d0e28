use std::collections::VecDeque;

use crate::model::QuestionSignature;

/// Sliding window over the most recently issued question signatures.
///
/// A window of 0 disables tracking.
#[derive(Debug, Clone, Default)]
pub struct RecentCombinations {
    window: usize,
    recent: VecDeque<QuestionSignature>,
}

impl RecentCombinations {
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window,
            recent: VecDeque::with_capacity(window),
        }
    }

    #[must_use]
    pub fn contains(&self, signature: &QuestionSignature) -> bool {
        self.recent.contains(signature)
    }

    /// Remember `signature`, forgetting the oldest entry once the window is full.
    pub fn record(&mut self, signature: QuestionSignature) {
        if self.window == 0 {
            return;
        }
        if self.recent.len() == self.window {
            self.recent.pop_front();
        }
        self.recent.push_back(signature);
    }

    pub fn clear(&mut self) {
        self.recent.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.recent.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }
}

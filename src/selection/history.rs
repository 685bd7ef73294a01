use crate::catalog::{Category, Segment};
use std::collections::{HashMap, VecDeque};

/// Default anti-repetition window.
pub const DEFAULT_WINDOW: usize = 15;

/// Bounded recency ledger keyed by (category, segment).
///
/// Each queue keeps the last `window` accepted values in acceptance order,
/// duplicates included. The store is owned by whoever runs the generation
/// job and passed by reference into every sampling call.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    window: usize,
    queues: HashMap<(Category, Segment), VecDeque<String>>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl HistoryStore {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            queues: HashMap::new(),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Appends `value`, evicting the oldest entry once the window is full.
    pub fn record(&mut self, category: Category, segment: Segment, value: impl Into<String>) {
        if self.window == 0 {
            return;
        }
        let queue = self.queues.entry((category, segment)).or_default();
        queue.push_back(value.into());
        while queue.len() > self.window {
            queue.pop_front();
        }
    }

    /// Current window contents, oldest first.
    pub fn recent(&self, category: Category, segment: Segment) -> Vec<&str> {
        self.queues
            .get(&(category, segment))
            .map(|queue| queue.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn len(&self, category: Category, segment: Segment) -> usize {
        self.queues
            .get(&(category, segment))
            .map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self) -> bool {
        self.queues.values().all(VecDeque::is_empty)
    }

    /// Forgets every recorded value.
    pub fn reset(&mut self) {
        self.queues.clear();
    }
}

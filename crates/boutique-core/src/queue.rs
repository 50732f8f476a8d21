//! Single-consumer FIFO queue for pending presentation work.
//!
//! Level-up unlocks and achievement toasts are produced in bursts but
//! consumed one at a time by the presentation layer. [`PendingQueue`] makes
//! that handoff explicit: producers `enqueue`, the single consumer
//! `dequeue`s at its own cadence.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// An explicit FIFO queue. Order in is order out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingQueue<T> {
    items: VecDeque<T>,
}

impl<T> PendingQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Push to the back.
    pub fn enqueue(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Pop from the front. `None` when empty.
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Look at the front without consuming it.
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate front-to-back without consuming.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T> Default for PendingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for PendingQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

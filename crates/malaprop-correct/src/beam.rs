// Bounded top-K selection for beam pruning.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::state::{StateKey, rank};

/// A scored state carried through the beam.
#[derive(Debug, Clone)]
pub struct Scored<T> {
    pub score: f64,
    pub key: StateKey,
    pub value: T,
}

impl<T> PartialEq for Scored<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Scored<T> {}

impl<T> PartialOrd for Scored<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scored<T> {
    /// `Greater` is better: see [`rank`].
    fn cmp(&self, other: &Self) -> Ordering {
        rank(self.score, &self.key, other.score, &other.key)
    }
}

/// Keeps the best `capacity` states pushed into it.
///
/// A min-heap of the current survivors: the root is the worst kept state, so
/// each push costs O(log capacity) and memory never exceeds `capacity`.
/// The ordering is total (score, then key), so the survivors do not depend on
/// push order.
#[derive(Debug)]
pub struct Beam<T> {
    capacity: usize,
    heap: BinaryHeap<Reverse<Scored<T>>>,
}

impl<T> Beam<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1).min(1024)),
        }
    }

    /// Offer a state. Returns `true` if it was kept.
    pub fn push(&mut self, score: f64, key: StateKey, value: T) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let candidate = Scored { score, key, value };
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(candidate));
            return true;
        }
        match self.heap.peek() {
            Some(Reverse(worst)) if candidate > *worst => {
                self.heap.pop();
                self.heap.push(Reverse(candidate));
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Survivors, best first.
    pub fn into_sorted_vec(self) -> Vec<Scored<T>> {
        // Ascending order of Reverse<_> is descending order of Scored.
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(scored)| scored)
            .collect()
    }
}

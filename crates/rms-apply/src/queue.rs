//! Max-priority queue with first-in-first-out ties.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Entry<T> {
    priority: i64,
    seq: u64,
    value: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Pops the highest priority first; equal priorities pop in push order.
pub struct PriorityQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, value: T, priority: i64) {
        self.heap.push(Entry {
            priority,
            seq: self.next_seq,
            value,
        });
        self.next_seq += 1;
    }

    /// Remove the highest-priority value together with its priority.
    pub fn pop(&mut self) -> Option<(T, i64)> {
        self.heap.pop().map(|e| (e.value, e.priority))
    }

    #[must_use]
    pub fn peek(&self) -> Option<(&T, i64)> {
        self.heap.peek().map(|e| (&e.value, e.priority))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Iterator for PriorityQueue<T> {
    type Item = (T, i64);

    fn next(&mut self) -> Option<Self::Item> {
        self.pop()
    }
}

//! Binary min-heap keyed by time stamp.
//!
//! Entries with equal time stamps dequeue in insertion order.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use uplink_core::types::Timestamped;

struct Entry<T> {
    time_stamp: f64,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
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
        self.time_stamp
            .total_cmp(&other.time_stamp)
            .then(self.seq.cmp(&other.seq))
    }
}

pub struct PriorityQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    next_seq: u64,
}

impl<T: Timestamped> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// O(log n).
    pub fn enqueue(&mut self, item: T) {
        let entry = Entry {
            time_stamp: item.time_stamp(),
            seq: self.next_seq,
            item,
        };
        self.next_seq += 1;
        self.heap.push(Reverse(entry));
    }

    /// Earliest entry, O(1).
    pub fn peek(&self) -> Option<&T> {
        self.heap.peek().map(|Reverse(entry)| &entry.item)
    }

    /// Remove the earliest entry, O(log n).
    pub fn dequeue(&mut self) -> Option<T> {
        self.heap.pop().map(|Reverse(entry)| entry.item)
    }

    /// Remove the earliest entry only if it is due at `now`.
    pub fn dequeue_due(&mut self, now: f64) -> Option<T> {
        match self.heap.peek() {
            Some(Reverse(entry)) if entry.time_stamp <= now => self.dequeue(),
            _ => None,
        }
    }

    /// Linear scan over all entries in no particular order.
    pub fn any(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.heap.iter().any(|Reverse(entry)| predicate(&entry.item))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.heap.retain(|Reverse(entry)| keep(&entry.item));
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<T: Timestamped> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stamp(f64, &'static str);

    impl Timestamped for Stamp {
        fn time_stamp(&self) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_dequeues_in_time_order() {
        let mut queue = PriorityQueue::new();
        for (t, name) in [(3.0, "c"), (1.0, "a"), (2.0, "b")] {
            queue.enqueue(Stamp(t, name));
        }
        assert_eq!(queue.peek().map(|s| s.1), Some("a"));
        let order: Vec<_> = std::iter::from_fn(|| queue.dequeue()).map(|s| s.1).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_equal_stamps_keep_insertion_order() {
        let mut queue = PriorityQueue::new();
        queue.enqueue(Stamp(5.0, "first"));
        queue.enqueue(Stamp(5.0, "second"));
        queue.enqueue(Stamp(5.0, "third"));
        assert_eq!(queue.dequeue().map(|s| s.1), Some("first"));
        assert_eq!(queue.dequeue().map(|s| s.1), Some("second"));
        assert_eq!(queue.dequeue().map(|s| s.1), Some("third"));
    }

    #[test]
    fn test_dequeue_due_respects_now() {
        let mut queue = PriorityQueue::new();
        queue.enqueue(Stamp(2.0, "later"));
        assert!(queue.dequeue_due(1.9).is_none());
        assert_eq!(queue.dequeue_due(2.0).map(|s| s.1), Some("later"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_any_and_retain() {
        let mut queue = PriorityQueue::new();
        queue.enqueue(Stamp(1.0, "keep"));
        queue.enqueue(Stamp(2.0, "drop"));
        assert!(queue.any(|s| s.1 == "drop"));
        queue.retain(|s| s.1 != "drop");
        assert!(!queue.any(|s| s.1 == "drop"));
        assert_eq!(queue.len(), 1);
    }
}

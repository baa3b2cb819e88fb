//! Binary min-heap keyed by an `f64` score.
//!
//! Entries are ordered by score, then by insertion order, so equal scores
//! pop first-in first-out and a run over identical inputs always pops in
//! the same order. There is no decrease-key: pushing an item again leaves
//! the older entry queued, and callers compare the score returned by
//! [`MinHeap::pop`] against their own bookkeeping to discard stale copies.

use std::cmp::Ordering;

#[derive(Debug, Clone)]
struct Entry<T> {
    item: T,
    score: f64,
    seq: u64,
}

impl<T> Entry<T> {
    #[inline]
    fn precedes(&self, other: &Self) -> bool {
        match self.score.total_cmp(&other.score) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.seq < other.seq,
        }
    }
}

/// A binary min-heap of items tagged with the score they were pushed with.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    entries: Vec<Entry<T>>,
    seq: u64,
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MinHeap<T> {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            seq: 0,
        }
    }

    /// Create an empty heap with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            seq: 0,
        }
    }

    /// Whether the heap holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of queued entries, stale duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Remove every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.seq = 0;
    }

    /// Insert `item` with the given score.
    pub fn push(&mut self, item: T, score: f64) {
        let seq = self.seq;
        self.seq += 1;
        self.entries.push(Entry { item, score, seq });
        self.sift_up(self.entries.len() - 1);
    }

    /// Remove and return the minimum entry with its score, or `None` when
    /// the heap is empty.
    pub fn pop(&mut self) -> Option<(T, f64)> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        let top = self.entries.pop()?;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some((top.item, top.score))
    }

    /// The minimum entry and its score, without removing it.
    #[inline]
    pub fn peek(&self) -> Option<(&T, f64)> {
        self.entries.first().map(|e| (&e.item, e.score))
    }

    /// The minimum score, if any.
    #[inline]
    pub fn peek_score(&self) -> Option<f64> {
        self.entries.first().map(|e| e.score)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.entries[i].precedes(&self.entries[parent]) {
                break;
            }
            self.entries.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < len && self.entries[left].precedes(&self.entries[smallest]) {
                smallest = left;
            }
            if right < len && self.entries[right].precedes(&self.entries[smallest]) {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.entries.swap(i, smallest);
            i = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    /// Every parent's score is at most both of its children's scores.
    fn assert_heap_invariant<T>(h: &MinHeap<T>) {
        for (i, e) in h.entries.iter().enumerate().skip(1) {
            let parent = &h.entries[(i - 1) / 2];
            assert!(
                parent.score <= e.score,
                "parent {} > child {} at index {i}",
                parent.score,
                e.score
            );
        }
    }

    #[test]
    fn pops_in_ascending_order() {
        let mut h = MinHeap::new();
        h.push("c", 3.0);
        h.push("a", 1.0);
        h.push("b", 2.0);
        assert_eq!(h.len(), 3);
        assert_eq!(h.pop(), Some(("a", 1.0)));
        assert_eq!(h.pop(), Some(("b", 2.0)));
        assert_eq!(h.pop(), Some(("c", 3.0)));
        assert_eq!(h.pop(), None);
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut h = MinHeap::<u32>::new();
        assert!(h.is_empty());
        assert_eq!(h.pop(), None);
        assert_eq!(h.peek(), None);
        assert_eq!(h.peek_score(), None);
    }

    #[test]
    fn equal_scores_pop_fifo() {
        let mut h = MinHeap::new();
        for i in 0..5 {
            h.push(i, 1.5);
        }
        let order: Vec<_> = std::iter::from_fn(|| h.pop().map(|(i, _)| i)).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn duplicates_are_kept_with_their_scores() {
        let mut h = MinHeap::new();
        h.push('x', 9.0);
        h.push('x', 4.0);
        assert_eq!(h.pop(), Some(('x', 4.0)));
        assert_eq!(h.pop(), Some(('x', 9.0)));
    }

    #[test]
    fn matches_sorted_reference() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut h = MinHeap::new();
        let mut reference = Vec::new();
        for i in 0..500 {
            let score = rng.random_range(0.0..1000.0);
            h.push(i, score);
            reference.push(score);
        }
        reference.sort_by(f64::total_cmp);
        let popped: Vec<f64> = std::iter::from_fn(|| h.pop().map(|(_, s)| s)).collect();
        assert_eq!(popped, reference);
    }

    #[test]
    fn invariant_holds_under_interleaving() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut h = MinHeap::new();
        let mut pops = 0;
        for step in 0..2000 {
            if rng.random_range(0..3) == 0 {
                if let Some((_, s)) = h.pop() {
                    assert!(h.peek_score().is_none_or(|top| top >= s));
                    pops += 1;
                }
            } else {
                h.push(step, rng.random_range(0.0..100.0));
            }
            assert_heap_invariant(&h);
        }
        assert!(pops > 0);
    }

    #[test]
    fn clear_empties_and_resets_order() {
        let mut h = MinHeap::with_capacity(4);
        h.push(1, 1.0);
        h.push(2, 0.5);
        h.clear();
        assert!(h.is_empty());
        h.push(3, 2.0);
        assert_eq!(h.peek(), Some((&3, 2.0)));
    }
}

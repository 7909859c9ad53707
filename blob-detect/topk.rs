use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A local scale-space maximum found by one worker.
///
/// `index` is the flat row-major pixel index of the center. Candidates
/// order by `value`; equal values fall back to ascending flat index
/// (lexicographic coordinate order), which makes ranking, eviction and
/// merging fully deterministic.
#[derive(Debug, Clone, Copy)]
pub struct BlobCandidate {
    pub index: usize,
    pub sigma: f64,
    pub value: f32,
}

impl PartialEq for BlobCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BlobCandidate {}

impl Ord for BlobCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Greater = stronger. Lower index ranks above on ties.
        self.value
            .total_cmp(&other.value)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for BlobCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fixed-capacity selection of the strongest candidates, min-heap ordered so
/// the weakest survivor is inspected in O(1) and replaced in O(log K).
#[derive(Debug)]
pub struct BoundedTopK {
    capacity: usize,
    heap: BinaryHeap<Reverse<BlobCandidate>>,
}

impl BoundedTopK {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Bounded insert: push while below capacity, otherwise replace the
    /// minimum iff the new candidate outranks it.
    pub fn insert(&mut self, candidate: BlobCandidate) {
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(candidate));
        } else if candidate > self.heap.peek().expect("heap at capacity").0 {
            self.heap.pop();
            self.heap.push(Reverse(candidate));
        }
    }

    /// Weakest retained candidate, if any.
    pub fn min(&self) -> Option<&BlobCandidate> {
        self.heap.peek().map(|r| &r.0)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Drains the heap into a descending-sorted sequence for the merge step.
    pub fn into_sorted_desc(self) -> Vec<BlobCandidate> {
        self.heap.into_sorted_vec().into_iter().map(|r| r.0).collect()
    }
}

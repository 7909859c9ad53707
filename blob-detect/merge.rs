use crate::topk::BlobCandidate;
use std::collections::HashSet;

/// The authoritative ranking of the strongest candidates seen so far, plus
/// the minimum value a candidate must reach to still matter.
///
/// `min_accepted` starts at the accept-everything sentinel and is raised to
/// the K-th value once the list fills. It never decreases afterwards: merges
/// only replace entries with stronger ones.
#[derive(Debug)]
pub struct BlobRanking {
    capacity: usize,
    entries: Vec<BlobCandidate>,
    min_accepted: f32,
}

impl BlobRanking {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
            min_accepted: f32::NEG_INFINITY,
        }
    }

    /// Threshold snapshot handed to the next scan step.
    pub fn min_accepted(&self) -> f32 {
        self.min_accepted
    }

    /// Current ranking, strongest first.
    pub fn entries(&self) -> &[BlobCandidate] {
        &self.entries
    }

    /// Folds the per-worker sorted sequences of one scale step into the
    /// ranking. Lists are merged in worker order with a linear two-way merge,
    /// truncating to capacity after each fold, then the threshold is updated.
    ///
    /// A center that wins at more than one scale step keeps only its
    /// strongest entry; the weaker repeat is dropped during the merge.
    pub fn merge_step(&mut self, worker_lists: Vec<Vec<BlobCandidate>>) {
        for list in worker_lists {
            if list.is_empty() {
                continue;
            }
            self.entries = merge_desc(&self.entries, &list, self.capacity);
        }
        if self.entries.len() >= self.capacity {
            if let Some(last) = self.entries.last() {
                self.min_accepted = last.value;
            }
        }
    }

    /// Surrenders the final ranking for materialization.
    pub fn into_candidates(self) -> Vec<BlobCandidate> {
        self.entries
    }
}

/// Merges two descending-sorted runs, keeping at most `capacity` entries
/// and at most one entry per center. Entries are taken strongest first, so
/// the surviving entry for a repeated center is always its strongest one.
fn merge_desc(a: &[BlobCandidate], b: &[BlobCandidate], capacity: usize) -> Vec<BlobCandidate> {
    let mut out = Vec::with_capacity((a.len() + b.len()).min(capacity));
    let mut seen = HashSet::with_capacity((a.len() + b.len()).min(capacity));
    let (mut i, mut j) = (0, 0);
    while out.len() < capacity && (i < a.len() || j < b.len()) {
        let take_a = match (a.get(i), b.get(j)) {
            (Some(x), Some(y)) => x >= y,
            (Some(_), None) => true,
            _ => false,
        };
        let next = if take_a {
            i += 1;
            a[i - 1]
        } else {
            j += 1;
            b[j - 1]
        };
        if seen.insert(next.index) {
            out.push(next);
        }
    }
    out
}

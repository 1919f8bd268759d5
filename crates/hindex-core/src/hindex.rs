use serde::Serialize;

/// Result of an H-index computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HIndex {
    pub h: usize,
    /// Citation counts, largest first
    pub sorted: Vec<u64>,
}

impl HIndex {
    /// Whether the bar at `rank` (0-based, in `sorted`) is part of the h-core
    pub fn contributes(&self, rank: usize) -> bool {
        rank < self.h
    }
}

/// Compute the H-index of a list of citation counts
///
/// Sort descending, then walk until the value at 1-based rank `i` drops below
/// `i`. Values never increase along the sorted list, so nothing after the
/// first miss can satisfy its (larger) rank either.
pub fn compute_h_index(citations: &[u64]) -> HIndex {
    let mut sorted = citations.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let h = sorted
        .iter()
        .enumerate()
        .take_while(|&(i, &c)| c > i as u64)
        .count();

    HIndex { h, sorted }
}

//! Search state and configuration for the discrete embedding.

use std::cmp::Ordering;

use super::penalty::Penalty;

/// Assignment prefix explored by the best-first search.
///
/// `matched[c]` is the graph vertex of compressed joint `c`; `taken` marks
/// graph vertices lying on bone paths reconstructed so far.
#[derive(Clone, Debug)]
pub struct PartialMatch {
    pub matched: Vec<usize>,
    pub penalty: f64,
    pub heuristic: f64,
    pub taken: Vec<bool>,
}

impl PartialMatch {
    pub fn empty(graph_len: usize) -> Self {
        Self {
            matched: Vec::new(),
            penalty: 0.0,
            heuristic: 0.0,
            taken: vec![false; graph_len],
        }
    }
}

// Heap order: the smallest heuristic is the greatest element; among equal
// heuristics the longer prefix wins.
impl Ord for PartialMatch {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .heuristic
            .total_cmp(&self.heuristic)
            .then_with(|| self.matched.len().cmp(&other.matched.len()))
    }
}

impl PartialOrd for PartialMatch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PartialMatch {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PartialMatch {}

/// Weight per penalty term, indexed by `Penalty as usize`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PenaltyWeights(pub [f64; Penalty::COUNT]);

impl PenaltyWeights {
    #[inline]
    pub fn get(&self, p: Penalty) -> f64 {
        self.0[p as usize]
    }

    pub fn set(&mut self, p: Penalty, w: f64) {
        self.0[p as usize] = w;
    }
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self([0.027, 0.023, 0.007, 0.046, 0.014, 0.012, 0.072, 0.005, 0.033])
    }
}

/// How the frontier is processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// One thread, strict best-first order, deterministic.
    #[default]
    Sequential,
    /// Workers racing on one shared frontier; the first complete assignment
    /// any worker pops wins. `None` uses the available parallelism.
    Concurrent { threads: Option<usize> },
}

impl SearchMode {
    pub fn thread_count(&self) -> usize {
        match *self {
            SearchMode::Sequential => 1,
            SearchMode::Concurrent { threads: Some(n) } => n.max(1),
            SearchMode::Concurrent { threads: None } => {
                std::thread::available_parallelism().map_or(1, |n| n.get())
            }
        }
    }
}

/// Search configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchCfg {
    pub mode: SearchMode,
    /// Kept configurable only for ablations; the defaults are the tuned table.
    pub weights: PenaltyWeights,
}

/// Counters reported by a finished search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped from the frontier.
    pub expanded: usize,
    /// States pushed onto the frontier.
    pub pushed: usize,
}

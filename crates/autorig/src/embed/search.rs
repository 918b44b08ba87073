//! Best-first search over partial joint assignments.

use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};

use tracing::{debug, info, warn};

use super::paths::AllShortestPaths;
use super::penalty::{compute_penalty, PenaltyCtx};
use super::types::{PartialMatch, PenaltyWeights, SearchCfg, SearchMode, SearchStats};
use crate::discretize::{PtGraph, Sphere};
use crate::skeleton::Skeleton;

/// Assignment of one graph vertex per compressed joint, or empty when no
/// candidate sequence stays below total penalty 1.
pub fn discrete_embed(
    graph: &PtGraph,
    spheres: &[Sphere],
    skeleton: &Skeleton,
    possibilities: &[Vec<usize>],
    cfg: &SearchCfg,
) -> Vec<usize> {
    let paths = AllShortestPaths::new(graph);
    let ctx = PenaltyCtx::new(graph, spheres, skeleton, &paths);
    let (found, _) = search(&ctx, possibilities, cfg);
    found.map(|m| m.matched).unwrap_or_default()
}

/// Runs the configured search; the winning state keeps its penalty.
pub fn search(
    ctx: &PenaltyCtx<'_>,
    possibilities: &[Vec<usize>],
    cfg: &SearchCfg,
) -> (Option<PartialMatch>, SearchStats) {
    let runner = Matcher {
        ctx,
        possibilities,
        weights: cfg.weights,
        to_match: ctx.skeleton.compressed_len(),
    };
    debug!(joints = runner.to_match, mode = ?cfg.mode, "matching");
    let (found, stats) = match cfg.mode {
        SearchMode::Sequential => runner.run_sequential(),
        SearchMode::Concurrent { .. } => runner.run_concurrent(cfg.mode.thread_count()),
    };
    match &found {
        Some(m) => info!(
            residual = m.penalty,
            expanded = stats.expanded,
            pushed = stats.pushed,
            "match found"
        ),
        None => warn!(expanded = stats.expanded, "no match"),
    }
    (found, stats)
}

struct Matcher<'a, 'c> {
    ctx: &'c PenaltyCtx<'a>,
    possibilities: &'c [Vec<usize>],
    weights: PenaltyWeights,
    to_match: usize,
}

impl Matcher<'_, '_> {
    #[inline]
    fn penalty(&self, cur: &PartialMatch, next: usize, idx: usize) -> f64 {
        compute_penalty(self.ctx, &self.weights, cur, next, idx)
    }

    /// Feasible one-joint extensions of `cur`, heuristics filled in.
    fn expand(&self, cur: &PartialMatch) -> Vec<PartialMatch> {
        let idx = cur.matched.len();
        let sk = self.ctx.skeleton;
        let mut out = Vec::new();
        for &candidate in &self.possibilities[idx] {
            let extra = self.penalty(cur, candidate, idx);
            if cur.penalty + extra >= 1.0 {
                continue;
            }
            let mut next = cur.clone();
            next.matched.push(candidate);
            next.penalty += extra;
            next.heuristic = next.penalty;

            if let Some(prev) = sk.c_prev()[idx] {
                for v in self.ctx.paths.path(candidate, next.matched[prev]) {
                    next.taken[v] = true;
                }
            }

            // Cheapest placement of every joint whose parent is now placed.
            for j in idx + 1..self.to_match {
                if sk.c_prev()[j].map_or(true, |p| p > idx) {
                    continue;
                }
                let best = self.possibilities[j]
                    .iter()
                    .map(|&k| self.penalty(&next, k, j))
                    .fold(f64::INFINITY, f64::min);
                next.heuristic += best;
                if next.heuristic > 1.0 {
                    break;
                }
            }
            if next.heuristic > 1.0 {
                continue;
            }
            out.push(next);
        }
        out
    }

    fn initial(&self) -> PartialMatch {
        PartialMatch::empty(self.ctx.graph.len())
    }

    fn run_sequential(&self) -> (Option<PartialMatch>, SearchStats) {
        let mut stats = SearchStats::default();
        let mut todo = BinaryHeap::new();
        todo.push(self.initial());
        while let Some(cur) = todo.pop() {
            stats.expanded += 1;
            if cur.matched.len() == self.to_match {
                return (Some(cur), stats);
            }
            let children = self.expand(&cur);
            stats.pushed += children.len();
            todo.extend(children);
        }
        (None, stats)
    }

    /// Workers share one frontier. A worker holding no state waits while
    /// others are still expanding, and all exit once the frontier is empty
    /// with nobody expanding or once any worker has popped a full match.
    fn run_concurrent(&self, threads: usize) -> (Option<PartialMatch>, SearchStats) {
        let frontier = Mutex::new(Frontier {
            todo: BinaryHeap::from(vec![self.initial()]),
            in_flight: 0,
            found: None,
        });
        let wake = Condvar::new();
        let done = AtomicBool::new(false);
        let expanded = AtomicUsize::new(0);
        let pushed = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..threads.max(1) {
                s.spawn(|| self.worker(&frontier, &wake, &done, &expanded, &pushed));
            }
        });

        let found = frontier
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .found;
        let stats = SearchStats {
            expanded: expanded.into_inner(),
            pushed: pushed.into_inner(),
        };
        (found, stats)
    }

    fn worker(
        &self,
        frontier: &Mutex<Frontier>,
        wake: &Condvar,
        done: &AtomicBool,
        expanded: &AtomicUsize,
        pushed: &AtomicUsize,
    ) {
        loop {
            let cur = {
                let mut f = frontier.lock().unwrap_or_else(PoisonError::into_inner);
                loop {
                    if done.load(Ordering::Acquire) {
                        return;
                    }
                    if let Some(cur) = f.todo.pop() {
                        f.in_flight += 1;
                        break cur;
                    }
                    if f.in_flight == 0 {
                        // Exhausted: nobody can push any more.
                        done.store(true, Ordering::Release);
                        wake.notify_all();
                        return;
                    }
                    f = wake.wait(f).unwrap_or_else(PoisonError::into_inner);
                }
            };
            expanded.fetch_add(1, Ordering::Relaxed);

            if cur.matched.len() == self.to_match {
                let mut f = frontier.lock().unwrap_or_else(PoisonError::into_inner);
                f.in_flight -= 1;
                if f.found.is_none() {
                    f.found = Some(cur);
                }
                f.todo.clear();
                done.store(true, Ordering::Release);
                wake.notify_all();
                return;
            }

            let children = self.expand(&cur);
            let mut f = frontier.lock().unwrap_or_else(PoisonError::into_inner);
            f.in_flight -= 1;
            if !done.load(Ordering::Acquire) {
                pushed.fetch_add(children.len(), Ordering::Relaxed);
                f.todo.extend(children);
            }
            wake.notify_all();
        }
    }
}

struct Frontier {
    todo: BinaryHeap<PartialMatch>,
    in_flight: usize,
    found: Option<PartialMatch>,
}

//! All-pairs shortest paths on the proximity graph (Dijkstra per source).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::discretize::PtGraph;

#[derive(Clone, Copy, Debug)]
struct Entry {
    dist: f64,
    vert: usize,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on distance.
        other.dist.total_cmp(&self.dist)
    }
}
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Entry {}

/// Shortest-path trees rooted at every vertex, edge length = Euclidean.
#[derive(Clone, Debug, Default)]
pub struct AllShortestPaths {
    /// `next[root][v]`: the neighbour of `v` one step closer to `root`.
    next: Vec<Vec<Option<usize>>>,
    dist: Vec<Vec<f64>>,
}

impl AllShortestPaths {
    pub fn new(graph: &PtGraph) -> Self {
        let n = graph.len();
        let mut out = Self {
            next: Vec::with_capacity(n),
            dist: Vec::with_capacity(n),
        };
        for root in 0..n {
            let (next, dist) = dijkstra(graph, root);
            out.next.push(next);
            out.dist.push(dist);
        }
        out
    }

    /// Graph distance, `None` when `to` is unreachable from `from`.
    #[inline]
    pub fn dist(&self, from: usize, to: usize) -> Option<f64> {
        let d = self.dist[to][from];
        d.is_finite().then_some(d)
    }

    /// Vertices of a shortest path, starting at `from` and ending at `to`.
    /// Empty when unreachable, `[from]` when `from == to`.
    pub fn path(&self, from: usize, to: usize) -> Vec<usize> {
        if !self.dist[to][from].is_finite() {
            return Vec::new();
        }
        let tree = &self.next[to];
        let mut out = vec![from];
        let mut cur = from;
        while let Some(n) = tree[cur] {
            out.push(n);
            cur = n;
        }
        out
    }
}

fn dijkstra(graph: &PtGraph, root: usize) -> (Vec<Option<usize>>, Vec<f64>) {
    let n = graph.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut next = vec![None; n];
    let mut heap = BinaryHeap::new();
    dist[root] = 0.0;
    heap.push(Entry { dist: 0.0, vert: root });
    while let Some(Entry { dist: d, vert: v }) = heap.pop() {
        if d > dist[v] {
            continue;
        }
        for &w in &graph.edges[v] {
            let nd = d + (graph.verts[w] - graph.verts[v]).norm();
            if nd < dist[w] {
                dist[w] = nd;
                next[w] = Some(v);
                heap.push(Entry { dist: nd, vert: w });
            }
        }
    }
    (next, dist)
}

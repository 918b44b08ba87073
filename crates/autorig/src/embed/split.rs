//! Expanding a compressed match back onto the full skeleton.

use nalgebra::Vector3;

use super::paths::AllShortestPaths;
use crate::discretize::PtGraph;
use crate::skeleton::Skeleton;

/// Positions for the full joints of compressed bone `joint`, in
/// `Skeleton::bone_chain` order, when the bone runs from graph vertex
/// `prev_vertex` to `cur_vertex`.
///
/// Joint `k` of the chain lands at arc length `total * (f_1 + .. + f_k)`
/// along the shortest path, `f` being the length fractions.
pub fn split_path(
    graph: &PtGraph,
    paths: &AllShortestPaths,
    skeleton: &Skeleton,
    joint: usize,
    cur_vertex: usize,
    prev_vertex: usize,
) -> Vec<Vector3<f64>> {
    let chain = skeleton.bone_chain(joint);
    let path = paths.path(prev_vertex, cur_vertex);
    let start = graph.verts[prev_vertex];
    let mut out = vec![start; chain.len()];
    if path.len() < 2 {
        return out;
    }
    let total = paths.dist(prev_vertex, cur_vertex).unwrap_or(0.0);
    let mut targets = Vec::with_capacity(chain.len());
    targets.push(0.0);
    for &f in &chain[1..] {
        let last = targets[targets.len() - 1];
        targets.push(last + total * skeleton.fc_fraction()[f]);
    }

    let pts: Vec<Vector3<f64>> = path.iter().map(|&v| graph.verts[v]).collect();
    let mut so_far = 0.0;
    let mut slot = 1;
    let mut i = 1;
    while i < pts.len() && slot < targets.len() {
        let seg = pts[i] - pts[i - 1];
        let len = seg.norm();
        if len + so_far + 1e-6 <= targets[slot] {
            so_far += len;
            i += 1;
            continue;
        }
        let ratio = if len > 0.0 {
            (targets[slot] - so_far) / len
        } else {
            0.0
        };
        out[slot] = pts[i - 1] + seg * ratio;
        slot += 1;
    }
    out
}

/// Full-skeleton joint positions for a compressed assignment, indexed by
/// full joint. Empty input gives empty output.
pub fn split_paths(
    assignment: &[usize],
    graph: &PtGraph,
    skeleton: &Skeleton,
    paths: &AllShortestPaths,
) -> Vec<Vector3<f64>> {
    if assignment.is_empty() {
        return Vec::new();
    }
    let mut out = vec![Vector3::zeros(); skeleton.full_len()];
    out[skeleton.cf_map()[0]] = graph.verts[assignment[0]];
    for c in 1..assignment.len() {
        let Some(prev) = skeleton.c_prev()[c] else {
            continue;
        };
        let pts = split_path(graph, paths, skeleton, c, assignment[c], assignment[prev]);
        for (f, p) in skeleton.bone_chain(c).into_iter().zip(pts).skip(1) {
            out[f] = p;
        }
    }
    out
}

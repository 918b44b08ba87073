//! The nine cost terms scoring one extension of a partial match.
//!
//! Every term sees the same read-only context and returns a nonnegative
//! cost for placing compressed joint `idx` on graph vertex `next`, given the
//! prefix `cur` (which already holds joints `0..idx`). `NOMATCH` marks a
//! structurally impossible placement; after weighting it always exceeds 1.

use nalgebra::Vector3;

use super::paths::AllShortestPaths;
use super::split::split_path;
use super::types::{PartialMatch, PenaltyWeights};
use crate::cfg::{DIST_PLAY_FACTOR, NOMATCH, THIN_SPHERE_RADIUS};
use crate::discretize::{PtGraph, Sphere};
use crate::geom3::{normalize_or_zero, smooth_interp};
use crate::skeleton::Skeleton;

/// Read-only data shared by all penalty terms.
#[derive(Clone, Copy, Debug)]
pub struct PenaltyCtx<'a> {
    pub graph: &'a PtGraph,
    pub spheres: &'a [Sphere],
    pub skeleton: &'a Skeleton,
    pub paths: &'a AllShortestPaths,
    /// Lowest `y` over the graph vertices (at most 1).
    pub foot_base: f64,
}

impl<'a> PenaltyCtx<'a> {
    pub fn new(
        graph: &'a PtGraph,
        spheres: &'a [Sphere],
        skeleton: &'a Skeleton,
        paths: &'a AllShortestPaths,
    ) -> Self {
        let foot_base = graph.verts.iter().map(|v| v.y).fold(1.0, f64::min);
        Self {
            graph,
            spheres,
            skeleton,
            paths,
            foot_base,
        }
    }

    #[inline]
    fn radius(&self, v: usize) -> f64 {
        self.spheres[v].radius
    }

    #[inline]
    fn pos(&self, v: usize) -> Vector3<f64> {
        self.graph.verts[v]
    }

    #[inline]
    fn play(&self, a: usize, b: usize) -> f64 {
        DIST_PLAY_FACTOR * (self.radius(a) + self.radius(b))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Penalty {
    /// Graph path length vs. target bone length.
    Distance,
    /// Direction to the parent and to placed siblings vs. the reference pose.
    GlobalDot,
    /// Bone length vs. the mirrored bone.
    Sym,
    /// Reuse of graph vertices claimed by earlier bones.
    Double,
    /// Height of foot joints above the lowest graph vertex.
    Foot,
    /// Joint on the same vertex as its parent.
    Dup,
    /// Per-segment direction along the reconstructed bone chain.
    Dot,
    /// Leaf joint in the middle of a path instead of at its end.
    Extrem,
    /// Joints closer in the graph than through their common ancestor.
    Disjoint,
}

#[inline]
fn cube(x: f64) -> f64 {
    x * x * x
}

/// Angular cost shared by the `Dot` variants.
#[inline]
fn dir_cost(dot: f64) -> f64 {
    (1.0 - dot) * smooth_interp(dot, -0.5, 6.0, 0.0, 1.0)
}

impl Penalty {
    pub const COUNT: usize = 9;
    pub const ALL: [Penalty; Penalty::COUNT] = [
        Penalty::Distance,
        Penalty::GlobalDot,
        Penalty::Sym,
        Penalty::Double,
        Penalty::Foot,
        Penalty::Dup,
        Penalty::Dot,
        Penalty::Extrem,
        Penalty::Disjoint,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Penalty::Distance => "distance",
            Penalty::GlobalDot => "global_dot",
            Penalty::Sym => "sym",
            Penalty::Double => "double",
            Penalty::Foot => "foot",
            Penalty::Dup => "dup",
            Penalty::Dot => "dot",
            Penalty::Extrem => "extrem",
            Penalty::Disjoint => "disjoint",
        }
    }

    /// Unweighted cost of placing joint `idx >= 1` on `next`.
    pub fn eval(self, ctx: &PenaltyCtx<'_>, cur: &PartialMatch, next: usize, idx: usize) -> f64 {
        let Some(prev) = ctx.skeleton.c_prev()[idx] else {
            return 0.0;
        };
        let pv = cur.matched[prev];
        match self {
            Penalty::Distance => distance(ctx, next, pv, idx),
            Penalty::GlobalDot => global_dot(ctx, cur, next, idx, prev),
            Penalty::Sym => sym(ctx, cur, next, idx, pv),
            Penalty::Double => double(ctx, cur, next, pv),
            Penalty::Foot => {
                if ctx.skeleton.c_feet()[idx] {
                    ctx.pos(next).y - ctx.foot_base
                } else {
                    0.0
                }
            }
            Penalty::Dup => {
                if next == pv {
                    1.0
                } else {
                    0.0
                }
            }
            Penalty::Dot => dot(ctx, next, idx, prev, pv),
            Penalty::Extrem => extrem(ctx, next, idx, pv),
            Penalty::Disjoint => disjoint(ctx, cur, next, idx, prev),
        }
    }
}

/// Weighted sum of all terms; 2 as soon as one weighted term exceeds 1.
/// The root (`idx == 0`) is free.
pub fn compute_penalty(
    ctx: &PenaltyCtx<'_>,
    weights: &PenaltyWeights,
    cur: &PartialMatch,
    next: usize,
    idx: usize,
) -> f64 {
    if idx == 0 {
        return 0.0;
    }
    let mut out = 0.0;
    for p in Penalty::ALL {
        let v = p.eval(ctx, cur, next, idx) * weights.get(p);
        if v > 1.0 {
            return 2.0;
        }
        out += v;
    }
    out
}

fn distance(ctx: &PenaltyCtx<'_>, next: usize, pv: usize, idx: usize) -> f64 {
    let Some(dist) = ctx.paths.dist(next, pv) else {
        return NOMATCH;
    };
    let play = ctx.play(next, pv);
    let target = ctx.skeleton.c_length()[idx];
    if dist + play < 0.5 * target {
        return NOMATCH;
    }
    let short = cube(smooth_interp(target / (dist + play), 0.5, 0.0, 2.0, 3.0));
    // Over-long paths: zero up to the target length, then cubic.
    let long = if target > 0.0 {
        cube(smooth_interp((dist - play) / target, 1.0, 0.0, 3.0, 3.0))
    } else {
        0.0
    };
    short + long
}

fn global_dot(ctx: &PenaltyCtx<'_>, cur: &PartialMatch, next: usize, idx: usize, prev: usize) -> f64 {
    let sk = ctx.skeleton;
    let mut out = 0.0;
    for (i, &v) in cur.matched.iter().enumerate() {
        if i != prev && sk.c_prev()[i] != Some(prev) {
            continue;
        }
        let ours = ctx.pos(next) - ctx.pos(v);
        if ours.norm_squared() < 1e-16 {
            continue;
        }
        let given = normalize_or_zero(sk.c_graph().verts[idx] - sk.c_graph().verts[i]);
        let d = normalize_or_zero(ours).dot(&given);
        if i == prev {
            if d < 0.0 {
                return NOMATCH;
            }
            out += 0.5 * (((1.0 - d) * 4.0).powi(2) - 0.1).max(0.0);
        } else {
            if d < -0.5 {
                return NOMATCH;
            }
            out += 0.5 * (((1.0 - d) * 2.0).powi(2) - 0.5).max(0.0);
        }
    }
    out
}

fn sym(ctx: &PenaltyCtx<'_>, cur: &PartialMatch, next: usize, idx: usize, pv: usize) -> f64 {
    let sk = ctx.skeleton;
    let Some(v1) = sk.c_sym()[idx] else {
        return 0.0;
    };
    if v1 >= cur.matched.len() {
        return 0.0;
    }
    let Some(v2) = sk.c_prev()[v1] else {
        return 0.0;
    };
    let (m1, m2) = (cur.matched[v1], cur.matched[v2]);
    let (Some(dist), Some(s_dist)) = (ctx.paths.dist(next, pv), ctx.paths.dist(m1, m2)) else {
        return 0.0;
    };
    let dist_c = dist + ctx.play(next, pv);
    let s_dist_c = s_dist + ctx.play(m1, m2);
    let noc_ratio = (dist / (s_dist + 1e-8)).max(s_dist / (dist + 1e-8)).min(2.0);
    let ratio = (s_dist / dist_c).max(dist / s_dist_c);
    (cube(noc_ratio * 0.2 + ratio * 0.8) - 1.2).max(0.0)
}

fn double(ctx: &PenaltyCtx<'_>, cur: &PartialMatch, next: usize, pv: usize) -> f64 {
    let path = ctx.paths.path(next, pv);
    let mut out = 0.0;
    // Every path vertex except the parent's own, nearest to `next` weighs most.
    for i in (0..path.len().saturating_sub(1)).rev() {
        let v = path[i];
        if cur.taken[v] {
            if ctx.radius(v) < THIN_SPHERE_RADIUS {
                return NOMATCH;
            }
            out += 0.5 / ((i + 1) as f64).powi(2);
        }
    }
    if out == 0.0 {
        0.0
    } else {
        out + 0.5
    }
}

fn dot(ctx: &PenaltyCtx<'_>, next: usize, idx: usize, prev: usize, pv: usize) -> f64 {
    if next == pv {
        return 0.0;
    }
    let sk = ctx.skeleton;
    let f = sk.cf_map()[idx];
    let direct = sk.f_prev()[f].and_then(|p| sk.fc_map()[p]) == Some(prev);
    if direct {
        let s_dir = sk.c_graph().verts[idx] - sk.c_graph().verts[prev];
        let dir = ctx.pos(next) - ctx.pos(pv);
        let d = normalize_or_zero(s_dir).dot(&normalize_or_zero(dir));
        return s_dir.norm_squared() * 50.0 * dir_cost(d).powi(2);
    }
    let chain = sk.bone_chain(idx);
    let pts = split_path(ctx.graph, ctx.paths, sk, idx, next, pv);
    let mut out = 0.0;
    for k in 0..pts.len() - 1 {
        let dir = normalize_or_zero(pts[k + 1] - pts[k]);
        let s_dir = sk.full_pos(chain[k + 1]) - sk.full_pos(chain[k]);
        let d = normalize_or_zero(s_dir).dot(&dir);
        out += s_dir.norm_squared() * 50.0 * dir_cost(d).powi(2);
    }
    out
}

fn extrem(ctx: &PenaltyCtx<'_>, next: usize, idx: usize, pv: usize) -> f64 {
    if ctx.skeleton.c_graph().edges[idx].len() != 1 || next == pv {
        return 0.0;
    }
    let big = normalize_or_zero(ctx.pos(next) - ctx.pos(pv));
    let rad = ctx.radius(next);
    for &oth in &ctx.graph.edges[next] {
        if rad > 2.0 * ctx.radius(oth) {
            continue;
        }
        let d1 = normalize_or_zero(ctx.pos(oth) - ctx.pos(pv));
        let d2 = normalize_or_zero(ctx.pos(oth) - ctx.pos(next));
        if d1.dot(&big) > 0.95 && d2.dot(&big) > 0.8 {
            return 1.0;
        }
    }
    0.0
}

fn disjoint(ctx: &PenaltyCtx<'_>, cur: &PartialMatch, next: usize, idx: usize, prev: usize) -> f64 {
    let sk = ctx.skeleton;
    let mut out = 0.0;
    for (i, &vi) in cur.matched.iter().enumerate() {
        if i == idx || i == prev {
            continue;
        }
        let (mut a1, mut a2) = (idx, i);
        while a1 != a2 {
            if a1 < a2 {
                a2 = sk.c_prev()[a2].unwrap_or(0);
            } else {
                a1 = sk.c_prev()[a1].unwrap_or(0);
            }
        }
        let va = cur.matched[a1];
        let (Some(g), Some(b1), Some(b2)) = (
            ctx.paths.dist(next, vi),
            ctx.paths.dist(next, va),
            ctx.paths.dist(va, vi),
        ) else {
            continue;
        };
        let s_size = ctx.radius(next) + ctx.radius(vi);
        if (b1 + b2 + s_size) / (g + s_size) > 2.0 {
            out += 1.0;
        }
    }
    out
}

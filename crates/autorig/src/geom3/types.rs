//! Axis-aligned boxes in D dimensions.
//!
//! - `Rect<D>`: closed box `[lo, hi]`; empty iff some `lo[k] > hi[k]`.
//! - Corner `i` takes `hi[k]` where bit `k` of `i` is set, `lo[k]` otherwise.
//!   The octree's child numbering and the multilinear weights use the same
//!   convention.

use nalgebra::SVector;

/// Closed axis-aligned box.
///
/// Invariants:
/// - `lo <= hi` component-wise for non-empty boxes.
/// - Intersections may produce empty boxes; `content()` is 0 for those.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect<const D: usize> {
    pub lo: SVector<f64, D>,
    pub hi: SVector<f64, D>,
}

pub type Rect3 = Rect<3>;

impl<const D: usize> Rect<D> {
    pub const NUM_CORNERS: usize = 1 << D;

    #[inline]
    pub fn new(lo: SVector<f64, D>, hi: SVector<f64, D>) -> Self {
        Self { lo, hi }
    }

    /// Degenerate box holding a single point.
    #[inline]
    pub fn from_point(p: SVector<f64, D>) -> Self {
        Self { lo: p, hi: p }
    }

    /// `[0, 1]^D`.
    #[inline]
    pub fn unit() -> Self {
        Self {
            lo: SVector::zeros(),
            hi: SVector::repeat(1.0),
        }
    }

    #[inline]
    pub fn center(&self) -> SVector<f64, D> {
        (self.lo + self.hi) * 0.5
    }

    #[inline]
    pub fn size(&self) -> SVector<f64, D> {
        self.hi - self.lo
    }

    /// Half the length of the main diagonal.
    #[inline]
    pub fn half_diagonal(&self) -> f64 {
        self.size().norm() * 0.5
    }

    #[inline]
    pub fn corner(&self, idx: usize) -> SVector<f64, D> {
        SVector::from_fn(|k, _| {
            if (idx >> k) & 1 == 1 {
                self.hi[k]
            } else {
                self.lo[k]
            }
        })
    }

    pub fn corners(&self) -> impl Iterator<Item = SVector<f64, D>> + '_ {
        (0..Self::NUM_CORNERS).map(move |i| self.corner(i))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..D).any(|k| self.lo[k] > self.hi[k])
    }

    /// Volume (area in 2D); zero for empty boxes.
    #[inline]
    pub fn content(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.size().product()
        }
    }

    #[inline]
    pub fn contains(&self, p: &SVector<f64, D>) -> bool {
        (0..D).all(|k| self.lo[k] <= p[k] && p[k] <= self.hi[k])
    }

    #[inline]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            lo: self.lo.sup(&other.lo),
            hi: self.hi.inf(&other.hi),
        }
    }

    /// Smallest box containing both.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            lo: self.lo.inf(&other.lo),
            hi: self.hi.sup(&other.hi),
        }
    }

    /// Maps `p` into the box's local `[0, 1]^D` frame.
    #[inline]
    pub fn to_local(&self, p: &SVector<f64, D>) -> SVector<f64, D> {
        (p - self.lo).component_div(&self.size())
    }

    /// Squared distance from `p` to the box (zero inside).
    pub fn exterior_distance_sq(&self, p: &SVector<f64, D>) -> f64 {
        let mut out = 0.0;
        for k in 0..D {
            let d = if p[k] < self.lo[k] {
                self.lo[k] - p[k]
            } else if p[k] > self.hi[k] {
                p[k] - self.hi[k]
            } else {
                0.0
            };
            out += d * d;
        }
        out
    }
}

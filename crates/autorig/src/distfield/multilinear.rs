use nalgebra::Vector3;

use crate::geom3::Rect3;

/// Trilinear interpolant over one octree cell, stored as its 8 corner values.
///
/// Corner `i` follows `Rect::corner`: bit `k` set means the `hi` side of
/// axis `k`. All coordinates here are local, i.e. in `[0, 1]^3`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Multilinear {
    pub values: [f64; 8],
}

#[inline]
fn weight(idx: usize, k: usize, t: f64) -> f64 {
    if (idx >> k) & 1 == 1 {
        t
    } else {
        1.0 - t
    }
}

impl Multilinear {
    /// Samples `f` at the corners of `rect`.
    pub fn sample(rect: &Rect3, mut f: impl FnMut(&Vector3<f64>) -> f64) -> Self {
        let mut values = [0.0; 8];
        for (i, v) in values.iter_mut().enumerate() {
            *v = f(&rect.corner(i));
        }
        Self { values }
    }

    pub fn evaluate(&self, local: &Vector3<f64>) -> f64 {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| v * weight(i, 0, local.x) * weight(i, 1, local.y) * weight(i, 2, local.z))
            .sum()
    }

    /// Gradient with respect to the local coordinates.
    pub fn gradient(&self, local: &Vector3<f64>) -> Vector3<f64> {
        let mut g = Vector3::zeros();
        for (i, v) in self.values.iter().enumerate() {
            for k in 0..3 {
                let sign = if (i >> k) & 1 == 1 { 1.0 } else { -1.0 };
                let mut w = sign * v;
                for j in (0..3).filter(|&j| j != k) {
                    w *= weight(i, j, local[j]);
                }
                g[k] += w;
            }
        }
        g
    }

    /// Mean over the local sub-box `[lo, hi]`. Each axis enters linearly, so
    /// the mean is the value at the sub-box center.
    #[inline]
    pub fn mean_over(&self, lo: &Vector3<f64>, hi: &Vector3<f64>) -> f64 {
        self.evaluate(&((lo + hi) * 0.5))
    }
}

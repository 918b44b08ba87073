//! Exact distance oracles sampled by the octree builder.

use std::collections::HashMap;

use nalgebra::Vector3;

use crate::cfg::CACHE_SCALE;
use crate::geom3::{Rect3, TriMesh, TriangleBvh, XRayIntersector};

/// Exact distance oracle consumed by `DistTree::build_with`.
///
/// The builder calls `set_rect` before sampling inside a node's box, so an
/// implementation may specialize on the current region. Closures work as
/// oracles that ignore regions.
pub trait DistanceEval {
    fn eval(&mut self, p: &Vector3<f64>) -> f64;

    fn set_rect(&mut self, _rect: &Rect3) {}
}

impl<F: FnMut(&Vector3<f64>) -> f64> DistanceEval for F {
    #[inline]
    fn eval(&mut self, p: &Vector3<f64>) -> f64 {
        self(p)
    }
}

/// Memo of exact distances keyed by coordinates rounded to a 1/1023 grid.
///
/// Octree corners are shared by up to eight cells. The grid is slightly
/// coarser than the deepest octree level (spacing 1/1024), so adjacent
/// depth-10 corners can share a key and read back the same value.
#[derive(Clone, Debug, Default)]
pub struct DistCache {
    map: HashMap<[i64; 3], f64>,
    hits: u64,
}

impl DistCache {
    #[inline]
    fn key(p: &Vector3<f64>) -> [i64; 3] {
        [
            (p.x * CACHE_SCALE).round() as i64,
            (p.y * CACHE_SCALE).round() as i64,
            (p.z * CACHE_SCALE).round() as i64,
        ]
    }

    pub fn get(&mut self, p: &Vector3<f64>) -> Option<f64> {
        let out = self.map.get(&Self::key(p)).copied();
        if out.is_some() {
            self.hits += 1;
        }
        out
    }

    pub fn insert(&mut self, p: &Vector3<f64>, value: f64) {
        self.map.insert(Self::key(p), value);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }
}

/// Inside/outside knowledge for the box on top of the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Unknown,
    Outside,
    Inside,
}

/// Signed distance to a closed triangle mesh (negative inside).
///
/// Magnitude comes from the nearest surface point, the sign from the box
/// classification stack when known and from ray parity otherwise.
#[derive(Clone, Debug)]
pub struct MeshDistance {
    bvh: TriangleBvh,
    ray: XRayIntersector,
    cache: DistCache,
    rects: Vec<Rect3>,
    sides: Vec<Side>,
}

impl MeshDistance {
    pub fn new(mesh: &TriMesh) -> Self {
        Self {
            bvh: TriangleBvh::new(mesh),
            ray: XRayIntersector::new(mesh),
            cache: DistCache::default(),
            rects: Vec::new(),
            sides: Vec::new(),
        }
    }

    #[inline]
    pub fn cache(&self) -> &DistCache {
        &self.cache
    }

    /// Classification of the innermost box entered via `set_rect`.
    pub fn current_side(&self) -> Side {
        self.sides.last().copied().unwrap_or(Side::Unknown)
    }

    fn compute(&self, p: &Vector3<f64>) -> f64 {
        let d = self.bvh.distance(p);
        let inside = match self.current_side() {
            Side::Inside => true,
            Side::Outside => false,
            Side::Unknown => self.ray.is_inside(p),
        };
        if inside {
            -d
        } else {
            d
        }
    }
}

impl DistanceEval for MeshDistance {
    fn eval(&mut self, p: &Vector3<f64>) -> f64 {
        if let Some(v) = self.cache.get(p) {
            return v;
        }
        let v = self.compute(p);
        self.cache.insert(p, v);
        v
    }

    fn set_rect(&mut self, rect: &Rect3) {
        let center = rect.center();
        while let Some(top) = self.rects.last() {
            if top.contains(&center) {
                break;
            }
            self.rects.pop();
            self.sides.pop();
        }
        let mut side = self.current_side();
        if side == Side::Unknown {
            let d = self.eval(&center);
            let reach = rect.half_diagonal();
            if d > reach {
                side = Side::Outside;
            } else if d < -reach {
                side = Side::Inside;
            }
        }
        self.rects.push(*rect);
        self.sides.push(side);
    }
}

/// Unsigned distance to the nearest of a set of points.
///
/// Has no inside, so octrees over it are built with `crop_outside = false`.
#[derive(Clone, Debug, Default)]
pub struct PointDistance {
    pub points: Vec<Vector3<f64>>,
}

impl PointDistance {
    pub fn new(points: Vec<Vector3<f64>>) -> Self {
        Self { points }
    }
}

impl DistanceEval for PointDistance {
    fn eval(&mut self, p: &Vector3<f64>) -> f64 {
        self.points
            .iter()
            .map(|q| (q - p).norm_squared())
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }
}

//! Triangle soup with the checks the distance field relies on.
//!
//! The rigging core only needs positions and index triples; half-edge
//! adjacency, normals and file formats belong to the caller.

use std::fmt;

use nalgebra::Vector3;

use super::types::Rect3;

/// Immutable-ish triangle soup (vertices + index triples).
#[derive(Clone, Debug, Default)]
pub struct TriMesh {
    pub vertices: Vec<Vector3<f64>>,
    pub triangles: Vec<[usize; 3]>,
}

/// Uniform scale + translation applied by `TriMesh::normalize_bounding_box`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normalization {
    pub scale: f64,
    pub offset: Vector3<f64>,
}

impl Normalization {
    #[inline]
    pub fn apply(&self, p: &Vector3<f64>) -> Vector3<f64> {
        self.offset + p * self.scale
    }
    /// Maps a point from the normalized frame back to the input frame.
    #[inline]
    pub fn invert(&self, p: &Vector3<f64>) -> Vector3<f64> {
        (p - self.offset) / self.scale
    }
}

/// Reasons a mesh is rejected before distance-field construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// No vertices or no triangles.
    Empty,
    /// More than one connected component (counted over triangle vertices).
    Disconnected { components: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::Empty => write!(f, "mesh has no vertices or no triangles"),
            MeshError::Disconnected { components } => write!(
                f,
                "bad mesh: should be a single connected component (found {components})"
            ),
        }
    }
}

impl std::error::Error for MeshError {}

impl TriMesh {
    pub fn new(vertices: Vec<Vector3<f64>>, triangles: Vec<[usize; 3]>) -> Self {
        debug_assert!(
            triangles.iter().flatten().all(|&v| v < vertices.len()),
            "triangle index out of range"
        );
        Self {
            vertices,
            triangles,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }

    #[inline]
    pub fn triangle(&self, t: usize) -> [Vector3<f64>; 3] {
        let [a, b, c] = self.triangles[t];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    pub fn bounding_box(&self) -> Option<Rect3> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold(Rect3::from_point(first), |acc, v| {
                    acc.union(&Rect3::from_point(*v))
                }),
        )
    }

    /// Number of connected components; isolated vertices count as their own.
    pub fn component_count(&self) -> usize {
        let mut parent: Vec<usize> = (0..self.vertices.len()).collect();
        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }
        for tri in &self.triangles {
            for k in 0..3 {
                let a = find(&mut parent, tri[k]);
                let b = find(&mut parent, tri[(k + 1) % 3]);
                if a != b {
                    parent[a] = b;
                }
            }
        }
        (0..parent.len())
            .filter(|&v| find(&mut parent, v) == v)
            .count()
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.component_count() == 1
    }

    /// Scale uniformly so the largest side is 0.9 and center the box at 0.5³.
    pub fn normalize_bounding_box(&mut self) -> Normalization {
        let Some(bbox) = self.bounding_box() else {
            return Normalization {
                scale: 1.0,
                offset: Vector3::zeros(),
            };
        };
        let longest = bbox.size().max();
        let scale = if longest > 0.0 { 0.9 / longest } else { 1.0 };
        let offset = Vector3::repeat(0.5) - bbox.center() * scale;
        let norm = Normalization { scale, offset };
        for v in self.vertices.iter_mut() {
            *v = norm.apply(v);
        }
        norm
    }

    /// Validated copy fitted into the unit cube.
    pub fn prepared(&self) -> Result<(TriMesh, Normalization), MeshError> {
        if self.is_empty() {
            return Err(MeshError::Empty);
        }
        let components = self.component_count();
        if components != 1 {
            return Err(MeshError::Disconnected { components });
        }
        let mut out = self.clone();
        let norm = out.normalize_bounding_box();
        Ok((out, norm))
    }
}

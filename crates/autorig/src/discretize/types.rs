//! Data produced by the discretization stage.

use nalgebra::Vector3;

/// Ball inscribed in the mesh, centered near the medial surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vector3<f64>,
    pub radius: f64,
}

impl Sphere {
    #[inline]
    pub fn new(center: Vector3<f64>, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// Undirected graph on points; `edges[i]` lists the neighbors of `verts[i]`.
///
/// Invariant: adjacency is symmetric and free of self-loops.
#[derive(Clone, Debug, Default)]
pub struct PtGraph {
    pub verts: Vec<Vector3<f64>>,
    pub edges: Vec<Vec<usize>>,
}

impl PtGraph {
    pub fn with_verts(verts: Vec<Vector3<f64>>) -> Self {
        let n = verts.len();
        Self {
            verts,
            edges: vec![Vec::new(); n],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.verts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verts.is_empty()
    }

    pub fn add_edge(&mut self, a: usize, b: usize) {
        debug_assert_ne!(a, b, "self-loop");
        self.edges[a].push(b);
        self.edges[b].push(a);
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn is_symmetric(&self) -> bool {
        self.edges
            .iter()
            .enumerate()
            .all(|(i, nb)| nb.iter().all(|&j| j != i && self.edges[j].contains(&i)))
    }
}

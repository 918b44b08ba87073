use std::collections::HashMap;

use nalgebra::Vector3;
use tracing::debug;

use super::types::{Skeleton, SkeletonError};
use crate::discretize::PtGraph;

/// Declarative construction of a `Skeleton` from named joints.
///
/// Joints must be declared parent first; the first joint without a parent is
/// the root. Symmetry pairs and foot/fat flags refer to joints by name.
#[derive(Clone, Debug, Default)]
pub struct SkeletonBuilder {
    index: HashMap<String, usize>,
    names: Vec<String>,
    verts: Vec<Vector3<f64>>,
    prev: Vec<Option<usize>>,
    sym: Vec<Option<usize>>,
    feet: Vec<usize>,
    fat: Vec<usize>,
}

impl SkeletonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, name: &str) -> Result<usize, SkeletonError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| SkeletonError::UnknownJoint(name.to_string()))
    }

    /// Declares a joint; returns its full index.
    pub fn make_joint(
        &mut self,
        name: &str,
        pos: Vector3<f64>,
        parent: Option<&str>,
    ) -> Result<usize, SkeletonError> {
        if self.index.contains_key(name) {
            return Err(SkeletonError::DuplicateJoint(name.to_string()));
        }
        let prev = match parent {
            Some(p) => Some(self.lookup(p)?),
            None if self.verts.is_empty() => None,
            None => return Err(SkeletonError::MultipleRoots(name.to_string())),
        };
        let id = self.verts.len();
        self.index.insert(name.to_string(), id);
        self.names.push(name.to_string());
        self.verts.push(pos);
        self.prev.push(prev);
        self.sym.push(None);
        Ok(id)
    }

    pub fn make_symmetric(&mut self, a: &str, b: &str) -> Result<(), SkeletonError> {
        let (ia, ib) = (self.lookup(a)?, self.lookup(b)?);
        if ia == ib {
            return Err(SkeletonError::SelfSymmetric(a.to_string()));
        }
        // The later joint points at the earlier one, as the matcher only
        // compares against mirrors that are already placed.
        let (lo, hi) = (ia.min(ib), ia.max(ib));
        self.sym[hi] = Some(lo);
        Ok(())
    }

    /// Marks a joint that should land near the lowest part of the mesh.
    pub fn set_foot(&mut self, name: &str) -> Result<(), SkeletonError> {
        let id = self.lookup(name)?;
        self.feet.push(id);
        Ok(())
    }

    /// Marks a joint that should land in one of the thickest regions.
    pub fn set_fat(&mut self, name: &str) -> Result<(), SkeletonError> {
        let id = self.lookup(name)?;
        self.fat.push(id);
        Ok(())
    }

    /// Builds both graphs. Non-root joints with exactly two neighbours are
    /// dropped from the compressed graph.
    pub fn build(self) -> Result<Skeleton, SkeletonError> {
        let n = self.verts.len();
        if n == 0 {
            return Err(SkeletonError::Empty);
        }
        let mut f_graph = PtGraph::with_verts(self.verts.clone());
        for (i, p) in self.prev.iter().enumerate() {
            if let Some(p) = *p {
                f_graph.add_edge(i, p);
            }
        }

        let mut cf_map = Vec::new();
        let mut fc_map = vec![None; n];
        for i in 0..n {
            if i != 0 && f_graph.edges[i].len() == 2 {
                continue;
            }
            fc_map[i] = Some(cf_map.len());
            cf_map.push(i);
        }

        let m = cf_map.len();
        let mut c_graph = PtGraph::with_verts(cf_map.iter().map(|&f| self.verts[f]).collect());
        let mut c_prev = vec![None; m];
        let mut c_sym = vec![None; m];
        for (c, &f) in cf_map.iter().enumerate() {
            c_sym[c] = self.sym[f].and_then(|s| fc_map[s]);
            let mut cur = self.prev[f];
            while let Some(p) = cur {
                if let Some(cp) = fc_map[p] {
                    c_prev[c] = Some(cp);
                    break;
                }
                cur = self.prev[p];
            }
            if let Some(cp) = c_prev[c] {
                c_graph.add_edge(c, cp);
            }
        }

        let mut c_length = vec![0.0; m];
        let mut fc_fraction = vec![0.0; n];
        for c in 1..m {
            let mut chain = Vec::new();
            let mut cur = cf_map[c];
            while let Some(p) = self.prev[cur] {
                let len = (self.verts[cur] - self.verts[p]).norm();
                chain.push((cur, len));
                c_length[c] += len;
                cur = p;
                if fc_map[cur].is_some() {
                    break;
                }
            }
            for (f, len) in chain {
                fc_fraction[f] = if c_length[c] > 0.0 {
                    len / c_length[c]
                } else {
                    0.0
                };
            }
        }

        let flag = |ids: &[usize]| -> Result<Vec<bool>, SkeletonError> {
            let mut out = vec![false; m];
            for &f in ids {
                let c = fc_map[f].ok_or_else(|| SkeletonError::NotCompressed(self.names[f].clone()))?;
                out[c] = true;
            }
            Ok(out)
        };
        let c_feet = flag(&self.feet)?;
        let c_fat = flag(&self.fat)?;

        debug!(full = n, compressed = m, "skeleton built");
        Ok(Skeleton {
            names: self.names,
            f_prev: self.prev,
            f_sym: self.sym,
            f_graph,
            c_graph,
            c_prev,
            c_sym,
            c_feet,
            c_fat,
            cf_map,
            fc_map,
            fc_fraction,
            c_length,
        })
    }
}

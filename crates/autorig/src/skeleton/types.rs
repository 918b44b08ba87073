use std::fmt;

use nalgebra::Vector3;

use crate::discretize::PtGraph;

/// Reasons a skeleton description is rejected by `SkeletonBuilder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkeletonError {
    /// No joints were declared.
    Empty,
    DuplicateJoint(String),
    UnknownJoint(String),
    /// A second joint without a parent.
    MultipleRoots(String),
    /// Foot/fat flags apply to compressed joints only.
    NotCompressed(String),
    /// A joint cannot mirror itself.
    SelfSymmetric(String),
}

impl fmt::Display for SkeletonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkeletonError::Empty => write!(f, "skeleton has no joints"),
            SkeletonError::DuplicateJoint(n) => write!(f, "joint '{n}' declared twice"),
            SkeletonError::UnknownJoint(n) => write!(f, "unknown joint '{n}'"),
            SkeletonError::MultipleRoots(n) => {
                write!(f, "joint '{n}' has no parent but the root is already set")
            }
            SkeletonError::NotCompressed(n) => write!(
                f,
                "joint '{n}' has exactly two neighbours and is dropped from the compressed skeleton"
            ),
            SkeletonError::SelfSymmetric(n) => write!(f, "joint '{n}' cannot be its own mirror"),
        }
    }
}

impl std::error::Error for SkeletonError {}

/// Joint graph in its full form and in compressed form (degree-2 chains
/// collapsed into single bones).
///
/// Invariants:
/// - Joint 0 is the root in both graphs; every other parent index is smaller
///   than the child index.
/// - `cf_map[c]` is the full joint of compressed joint `c`;
///   `fc_map[f] == Some(c)` iff `cf_map[c] == f`.
/// - For each non-root full joint `f`, `fc_fraction[f]` is the length of the
///   bone ending at `f` over the length of the compressed bone containing it.
#[derive(Clone, Debug)]
pub struct Skeleton {
    pub(crate) names: Vec<String>,

    pub(crate) f_graph: PtGraph,
    pub(crate) f_prev: Vec<Option<usize>>,
    pub(crate) f_sym: Vec<Option<usize>>,

    pub(crate) c_graph: PtGraph,
    pub(crate) c_prev: Vec<Option<usize>>,
    pub(crate) c_sym: Vec<Option<usize>>,
    pub(crate) c_feet: Vec<bool>,
    pub(crate) c_fat: Vec<bool>,

    pub(crate) cf_map: Vec<usize>,
    pub(crate) fc_map: Vec<Option<usize>>,
    pub(crate) fc_fraction: Vec<f64>,
    pub(crate) c_length: Vec<f64>,
}

impl Skeleton {
    pub fn f_graph(&self) -> &PtGraph {
        &self.f_graph
    }
    pub fn f_prev(&self) -> &[Option<usize>] {
        &self.f_prev
    }
    pub fn f_sym(&self) -> &[Option<usize>] {
        &self.f_sym
    }
    pub fn c_graph(&self) -> &PtGraph {
        &self.c_graph
    }
    pub fn c_prev(&self) -> &[Option<usize>] {
        &self.c_prev
    }
    pub fn c_sym(&self) -> &[Option<usize>] {
        &self.c_sym
    }
    pub fn c_feet(&self) -> &[bool] {
        &self.c_feet
    }
    pub fn c_fat(&self) -> &[bool] {
        &self.c_fat
    }
    pub fn cf_map(&self) -> &[usize] {
        &self.cf_map
    }
    pub fn fc_map(&self) -> &[Option<usize>] {
        &self.fc_map
    }
    pub fn fc_fraction(&self) -> &[f64] {
        &self.fc_fraction
    }
    pub fn c_length(&self) -> &[f64] {
        &self.c_length
    }

    #[inline]
    pub fn full_len(&self) -> usize {
        self.f_graph.len()
    }

    #[inline]
    pub fn compressed_len(&self) -> usize {
        self.c_graph.len()
    }

    pub fn joint_name(&self, full: usize) -> &str {
        &self.names[full]
    }

    pub fn joint_for_name(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Full joints on the compressed bone ending at compressed joint `c`,
    /// from the compressed parent's joint down to `cf_map[c]` (both included).
    /// The root yields just itself.
    pub fn bone_chain(&self, c: usize) -> Vec<usize> {
        let mut chain = vec![self.cf_map[c]];
        while let Some(p) = self.f_prev[chain[chain.len() - 1]] {
            chain.push(p);
            if self.fc_map[p].is_some() {
                break;
            }
        }
        chain.reverse();
        chain
    }

    /// Uniform scale of joint positions and bone lengths.
    pub fn scale(&mut self, factor: f64) {
        for v in self.f_graph.verts.iter_mut() {
            *v *= factor;
        }
        for v in self.c_graph.verts.iter_mut() {
            *v *= factor;
        }
        for l in self.c_length.iter_mut() {
            *l *= factor;
        }
    }

    /// Full joint position in the reference pose.
    #[inline]
    pub fn full_pos(&self, f: usize) -> Vector3<f64> {
        self.f_graph.verts[f]
    }
}

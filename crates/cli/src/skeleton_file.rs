use anyhow::{Context, Result};
use autorig::api::{Skeleton, SkeletonBuilder};
use autorig::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// JSON skeleton description. Joints are listed parents first, positions in
/// the unit-cube frame the mesh is normalized into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkeletonFile {
    pub joints: Vec<JointSpec>,
    #[serde(default)]
    pub symmetric: Vec<[String; 2]>,
    #[serde(default)]
    pub feet: Vec<String>,
    #[serde(default)]
    pub fat: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JointSpec {
    pub name: String,
    pub pos: [f64; 3],
    #[serde(default)]
    pub parent: Option<String>,
}

impl SkeletonFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn build(&self) -> Result<Skeleton> {
        let mut b = SkeletonBuilder::new();
        for j in &self.joints {
            let [x, y, z] = j.pos;
            b.make_joint(&j.name, Vec3::new(x, y, z), j.parent.as_deref())
                .with_context(|| format!("joint {}", j.name))?;
        }
        for [a, c] in &self.symmetric {
            b.make_symmetric(a, c)
                .with_context(|| format!("symmetry {a} <-> {c}"))?;
        }
        for name in &self.feet {
            b.set_foot(name).with_context(|| format!("foot {name}"))?;
        }
        for name in &self.fat {
            b.set_fat(name).with_context(|| format!("fat {name}"))?;
        }
        Ok(b.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const ARM: &str = r#"{
        "joints": [
            {"name": "shoulder", "pos": [0.5, 0.5, 0.5]},
            {"name": "elbow", "pos": [0.3, 0.5, 0.5], "parent": "shoulder"},
            {"name": "hand", "pos": [0.1, 0.5, 0.5], "parent": "elbow"},
            {"name": "other", "pos": [0.7, 0.5, 0.5], "parent": "shoulder"}
        ],
        "symmetric": [["hand", "other"]],
        "fat": ["shoulder"]
    }"#;

    #[test]
    fn builds_compressed_skeleton() {
        let f: SkeletonFile = serde_json::from_str(ARM).unwrap();
        assert!(f.feet.is_empty());
        let sk = f.build().unwrap();
        assert_eq!(sk.full_len(), 4);
        // The elbow is a chain joint.
        assert_eq!(sk.compressed_len(), 3);
        assert!(sk.c_fat()[0]);
    }

    #[test]
    fn unknown_names_are_errors() {
        let mut f: SkeletonFile = serde_json::from_str(ARM).unwrap();
        f.feet.push("toe".into());
        let err = f.build().unwrap_err();
        assert!(format!("{err:#}").contains("toe"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("arm.json");
        fs::write(&p, ARM).unwrap();
        assert_eq!(SkeletonFile::load(&p).unwrap().joints.len(), 4);
        fs::write(&p, "{").unwrap();
        assert!(SkeletonFile::load(&p).is_err());
    }
}

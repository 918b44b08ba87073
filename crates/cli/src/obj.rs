use anyhow::{bail, Context, Result};
use autorig::api::TriMesh;
use autorig::Vec3;
use std::fs;
use std::path::Path;

/// Reads `v` and `f` records of a Wavefront OBJ file; everything else is
/// skipped. Polygons are fan-triangulated.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_obj(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_obj(text: &str) -> Result<TriMesh> {
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let mut tok = line.split_whitespace();
        match tok.next() {
            Some("v") => {
                let mut c = [0.0; 3];
                for slot in c.iter_mut() {
                    let s = tok.next().with_context(|| format!("line {}: short vertex", lineno + 1))?;
                    *slot = s
                        .parse()
                        .with_context(|| format!("line {}: bad coordinate {s:?}", lineno + 1))?;
                }
                vertices.push(Vec3::new(c[0], c[1], c[2]));
            }
            Some("f") => {
                let idx = tok
                    .map(|t| face_index(t, vertices.len()))
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| format!("line {}", lineno + 1))?;
                if idx.len() < 3 {
                    bail!("line {}: face with {} vertices", lineno + 1, idx.len());
                }
                for k in 1..idx.len() - 1 {
                    triangles.push([idx[0], idx[k], idx[k + 1]]);
                }
            }
            _ => {}
        }
    }
    Ok(TriMesh::new(vertices, triangles))
}

/// `i`, `i/t`, `i//n` or `i/t/n`; 1-based, negative counts from the end.
fn face_index(token: &str, n_verts: usize) -> Result<usize> {
    let head = token.split('/').next().unwrap_or(token);
    let i: i64 = head
        .parse()
        .with_context(|| format!("bad face index {token:?}"))?;
    let resolved = if i < 0 { n_verts as i64 + i } else { i - 1 };
    if resolved < 0 || resolved as usize >= n_verts {
        bail!("face index {i} out of range (have {n_verts} vertices)");
    }
    Ok(resolved as usize)
}

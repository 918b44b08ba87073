//! Procedural closed meshes for tests, benchmarks and demos.

use std::collections::{HashMap, HashSet};

use nalgebra::Vector3;

use super::mesh::TriMesh;

/// Regular octahedron with vertices at `center ± radius·e_k`.
pub fn octahedron(center: Vector3<f64>, radius: f64) -> TriMesh {
    let mut vertices = Vec::with_capacity(6);
    for k in 0..3 {
        let mut e = Vector3::zeros();
        e[k] = radius;
        vertices.push(center + e);
        vertices.push(center - e);
    }
    // +x,-x,+y,-y,+z,-z = 0..6; one face per octant, outward orientation.
    let mut triangles = Vec::with_capacity(8);
    for sx in [0usize, 1] {
        for sy in [2usize, 3] {
            for sz in [4usize, 5] {
                let odd = (sx + (sy - 2) + (sz - 4)) % 2 == 1;
                if odd {
                    triangles.push([sx, sz, sy]);
                } else {
                    triangles.push([sx, sy, sz]);
                }
            }
        }
    }
    TriMesh::new(vertices, triangles)
}

/// Axis-aligned box with two triangles per face.
pub fn cuboid(lo: Vector3<f64>, hi: Vector3<f64>) -> TriMesh {
    voxel_mesh(&[[0, 0, 0]], |c| {
        Vector3::new(
            if c[0] == 0 { lo.x } else { hi.x },
            if c[1] == 0 { lo.y } else { hi.y },
            if c[2] == 0 { lo.z } else { hi.z },
        )
    })
}

/// Boundary surface of a union of unit voxels, scaled by `cell`.
///
/// Faces shared by two filled voxels are dropped, so the result is closed.
/// Callers avoid edge-only contacts between voxels to stay manifold.
pub fn voxel_solid(cells: &[[i32; 3]], cell: f64) -> TriMesh {
    voxel_mesh(cells, |c| {
        Vector3::new(c[0] as f64, c[1] as f64, c[2] as f64) * cell
    })
}

fn voxel_mesh(cells: &[[i32; 3]], place: impl Fn([i32; 3]) -> Vector3<f64>) -> TriMesh {
    let filled: HashSet<[i32; 3]> = cells.iter().copied().collect();
    let mut index: HashMap<[i32; 3], usize> = HashMap::new();
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    let mut vert = |c: [i32; 3], vertices: &mut Vec<Vector3<f64>>| -> usize {
        *index.entry(c).or_insert_with(|| {
            vertices.push(place(c));
            vertices.len() - 1
        })
    };
    let mut sorted: Vec<[i32; 3]> = filled.iter().copied().collect();
    sorted.sort_unstable();
    for c in sorted {
        for axis in 0..3 {
            for sign in [1i32, -1] {
                let mut n = c;
                n[axis] += sign;
                if filled.contains(&n) {
                    continue;
                }
                let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
                let mut quad = [[0i32; 3]; 4];
                for (q, (du, dv)) in [(0, 0), (1, 0), (1, 1), (0, 1)].into_iter().enumerate() {
                    let mut p = c;
                    if sign > 0 {
                        p[axis] += 1;
                    }
                    p[u] += du;
                    p[v] += dv;
                    quad[q] = p;
                }
                if sign < 0 {
                    quad.swap(1, 3);
                }
                let ids = quad.map(|p| vert(p, &mut vertices));
                triangles.push([ids[0], ids[1], ids[2]]);
                triangles.push([ids[0], ids[2], ids[3]]);
            }
        }
    }
    TriMesh::new(vertices, triangles)
}

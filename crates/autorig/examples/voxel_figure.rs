//! Rigging a blocky humanoid built from voxels.
//!
//! Purpose
//! - Show the whole pipeline on a mesh that needs no files: a voxel figure
//!   with legs, torso, arms and head, and a matching nine-joint skeleton.
//! - Print stage sizes and timings plus the recovered joint positions.
//!
//! Usage
//!   cargo run --release -p autorig --example voxel_figure [tree_tol]

use std::time::Instant;

use autorig::api::{shapes, try_autorig, RigCfg, SearchMode, Skeleton, SkeletonBuilder};
use nalgebra::vector;

/// Voxel cells (unit size) of a figure 9 wide, 12 tall and 2 deep.
fn figure_cells() -> Vec<[i32; 3]> {
    let mut cells = Vec::new();
    let mut fill = |x0: i32, x1: i32, y0: i32, y1: i32| {
        for x in x0..x1 {
            for y in y0..y1 {
                cells.push([x, y, 0]);
                cells.push([x, y, 1]);
            }
        }
    };
    fill(2, 3, 0, 5); // left leg
    fill(6, 7, 0, 5); // right leg
    fill(2, 7, 5, 10); // torso
    fill(0, 2, 8, 9); // left arm
    fill(7, 9, 8, 9); // right arm
    fill(4, 5, 10, 12); // neck and head
    cells
}

/// Joint positions in the normalized frame of `figure_cells` at cell size 1
/// (the figure is 12 cells tall, scaled to 0.9 and centered).
fn humanoid() -> Skeleton {
    let s = 0.9 / 12.0;
    let at = |x: f64, y: f64| vector![0.5 + (x - 4.5) * s, 0.5 + (y - 6.0) * s, 0.5];
    let mut b = SkeletonBuilder::new();
    let joints = [
        ("hips", at(4.5, 5.5), None),
        ("chest", at(4.5, 8.5), Some("hips")),
        ("head", at(4.5, 11.5), Some("chest")),
        ("lshoulder", at(2.5, 8.5), Some("chest")),
        ("lhand", at(0.5, 8.5), Some("lshoulder")),
        ("rshoulder", at(6.5, 8.5), Some("chest")),
        ("rhand", at(8.5, 8.5), Some("rshoulder")),
        ("lfoot", at(2.5, 0.5), Some("hips")),
        ("rfoot", at(6.5, 0.5), Some("hips")),
    ];
    for (name, pos, parent) in joints {
        b.make_joint(name, pos, parent).expect("joint");
    }
    let flags = [
        b.make_symmetric("lhand", "rhand"),
        b.make_symmetric("lshoulder", "rshoulder"),
        b.make_symmetric("lfoot", "rfoot"),
        b.set_foot("lfoot"),
        b.set_foot("rfoot"),
        b.set_fat("chest"),
    ];
    for f in flags {
        f.expect("skeleton flags");
    }
    b.build().expect("skeleton")
}

fn main() {
    let tol: f64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.01);
    let mesh = shapes::voxel_solid(&figure_cells(), 1.0);
    let skeleton = humanoid();
    let cfg = RigCfg {
        tree_tol: tol,
        medial_tol: tol,
        search: autorig::api::SearchCfg {
            mode: SearchMode::Concurrent { threads: None },
            ..Default::default()
        },
        ..RigCfg::default()
    };

    let t0 = Instant::now();
    match try_autorig(&skeleton, &mesh, &cfg) {
        Ok(out) => {
            println!(
                "tol={tol} nodes={} spheres={} edges={} expanded={} penalty={:.4} time_ms={:.1}",
                out.field.node_count(),
                out.spheres.len(),
                out.graph.edge_count(),
                out.stats.expanded,
                out.penalty,
                t0.elapsed().as_secs_f64() * 1e3
            );
            for (i, p) in out.world_embedding().iter().enumerate() {
                println!("{:>10} {:8.3} {:8.3} {:8.3}", skeleton.joint_name(i), p.x, p.y, p.z);
            }
        }
        Err(e) => println!("tol={tol} failed: {e}"),
    }
}

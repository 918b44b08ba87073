use super::*;
use crate::cfg::MAX_TREE_LEVEL;
use crate::geom3::{shapes, Rect3};
use nalgebra::{vector, Vector3};
use proptest::prelude::*;

fn octahedron() -> crate::geom3::TriMesh {
    shapes::octahedron(Vector3::repeat(0.5), 0.45)
}

fn sphere_field(p: &Vector3<f64>) -> f64 {
    (p - Vector3::repeat(0.5)).norm() - 0.3
}

proptest! {
    #[test]
    fn interpolant_passes_through_corners(
        vals in prop::array::uniform8(-1.0f64..1.0),
        idx in 0usize..8,
    ) {
        let m = Multilinear { values: vals };
        let corner = Rect3::unit().corner(idx);
        prop_assert!((m.evaluate(&corner) - vals[idx]).abs() < 1e-12);
    }

    #[test]
    fn gradient_matches_finite_differences(
        vals in prop::array::uniform8(-1.0f64..1.0),
        x in 0.1f64..0.9, y in 0.1f64..0.9, z in 0.1f64..0.9,
    ) {
        let m = Multilinear { values: vals };
        let p = vector![x, y, z];
        let g = m.gradient(&p);
        let h = 1e-6;
        for k in 0..3 {
            let mut e = Vector3::zeros();
            e[k] = h;
            let fd = (m.evaluate(&(p + e)) - m.evaluate(&(p - e))) / (2.0 * h);
            prop_assert!((fd - g[k]).abs() < 1e-6);
        }
    }
}

#[test]
fn linear_field_is_reproduced_exactly() {
    let f = |p: &Vector3<f64>| 2.0 * p.x - p.y + 0.5 * p.z;
    let m = Multilinear::sample(&Rect3::unit(), f);
    let q = vector![0.3, 0.7, 0.1];
    assert!((m.evaluate(&q) - f(&q)).abs() < 1e-12);
    assert!((m.gradient(&q) - vector![2.0, -1.0, 0.5]).norm() < 1e-12);
}

#[test]
fn octahedron_root_corners_and_depth() {
    let mesh = octahedron();
    let tree = DistTree::build(&mesh, 0.01);
    assert!(tree.max_level() <= MAX_TREE_LEVEL);
    assert!(tree.children(tree.root()).is_some());
    let mut fresh = MeshDistance::new(&mesh);
    let root = tree.node(tree.root());
    for i in 0..8 {
        let c = root.rect.corner(i);
        assert_eq!(root.interp.values[i], fresh.eval(&c));
        // Corners of the unit cube lie outside the octahedron.
        assert!(root.interp.values[i] > 0.0);
    }
    assert!(tree.evaluate(&Vector3::repeat(0.5)) < -0.2);
}

#[test]
fn leaf_corners_equal_cached_evaluator() {
    let mesh = octahedron();
    let mut eval = MeshDistance::new(&mesh);
    let tree = DistTree::build_with(&mut eval, 0.02, true);
    for id in tree.leaves() {
        let node = tree.node(id);
        for i in 0..8 {
            assert_eq!(node.interp.values[i], eval.eval(&node.rect.corner(i)));
        }
    }
    assert!(eval.cache().hits() > 0);
}

#[test]
fn split_decisions_match_grid_error() {
    let tol = 0.004;
    let mut f = sphere_field;
    let tree = DistTree::build_with(&mut f, tol, false);
    let grid_err = |id: NodeId| -> f64 {
        let n = tree.node(id);
        let mut worst: f64 = 0.0;
        for a in 0..3 {
            for b in 0..3 {
                for c in 0..3 {
                    if a != 1 && b != 1 && c != 1 {
                        continue;
                    }
                    let t = vector![a as f64, b as f64, c as f64] * 0.5;
                    let p = n.rect.lo + n.rect.size().component_mul(&t);
                    let local = n.rect.to_local(&p);
                    worst = worst.max((n.interp.evaluate(&local) - sphere_field(&p)).abs());
                }
            }
        }
        worst
    };
    for id in 0..tree.node_count() {
        let n = tree.node(id);
        if id == tree.root() || n.level >= MAX_TREE_LEVEL {
            continue;
        }
        if n.is_leaf() {
            assert!(grid_err(id) <= tol, "unsplit node {id} exceeds tol");
        } else {
            assert!(grid_err(id) > tol, "split node {id} within tol");
        }
    }
}

#[test]
fn evaluate_gradient_and_locate_are_consistent() {
    let mut f = sphere_field;
    let tree = DistTree::build_with(&mut f, 0.002, false);
    for p in [
        vector![0.5, 0.5, 0.9],
        vector![0.2, 0.45, 0.5],
        vector![0.61, 0.33, 0.7],
    ] {
        let leaf = tree.locate(&p);
        assert!(tree.node(leaf).is_leaf());
        assert!(tree.node(leaf).rect.contains(&p));
        assert!((tree.evaluate(&p) - sphere_field(&p)).abs() < 0.01);
        let g = tree.gradient(&p);
        let expected = (p - Vector3::repeat(0.5)).normalize();
        assert!(g.normalize().dot(&expected) > 0.95);
    }
}

#[test]
fn integrate_linear_field() {
    let f = |p: &Vector3<f64>| p.x + 2.0 * p.y;
    let mut eval = f;
    let tree = DistTree::build_with(&mut eval, 1e-6, false);
    // Linear fields never need more than the forced root split.
    assert_eq!(tree.node_count(), 9);
    assert!((tree.integrate(&Rect3::unit()) - 1.5).abs() < 1e-12);
    let sub = Rect3::new(vector![0.25, 0.0, 0.0], vector![0.75, 0.5, 1.0]);
    // Mean of x + 2y over sub is 0.5 + 0.5, content 0.25.
    assert!((tree.integrate(&sub) - 0.25).abs() < 1e-12);
    let outside = Rect3::new(vector![2.0, 2.0, 2.0], vector![3.0, 3.0, 3.0]);
    assert_eq!(tree.integrate(&outside), 0.0);
}

#[test]
fn crop_outside_prunes_far_cells() {
    let mesh = shapes::octahedron(Vector3::repeat(0.5), 0.2);
    let cropped = DistTree::build(&mesh, 0.005);
    let mut eval = MeshDistance::new(&mesh);
    let full = DistTree::build_with(&mut eval, 0.005, false);
    assert!(cropped.node_count() < full.node_count());
}

#[test]
fn mesh_distance_classifies_boxes() {
    let mesh = octahedron();
    let mut eval = MeshDistance::new(&mesh);
    eval.set_rect(&Rect3::unit());
    assert_eq!(eval.current_side(), Side::Unknown);
    let inner = Rect3::new(Vector3::repeat(0.48), Vector3::repeat(0.52));
    eval.set_rect(&inner);
    assert_eq!(eval.current_side(), Side::Inside);
    assert!(eval.eval(&Vector3::repeat(0.5)) < 0.0);
    // Leaving the inner box pops it again.
    let corner = Rect3::new(Vector3::zeros(), Vector3::repeat(0.02));
    eval.set_rect(&corner);
    assert_eq!(eval.current_side(), Side::Outside);
}

#[test]
fn point_distance_is_unsigned() {
    let mut pd = PointDistance::new(vec![vector![0.0, 0.0, 0.0], vector![1.0, 0.0, 0.0]]);
    assert!((pd.eval(&vector![0.4, 0.3, 0.0]) - 0.5).abs() < 1e-12);
    let tree = DistTree::build_with(&mut pd, 0.01, false);
    assert!(tree.evaluate(&vector![0.5, 0.5, 0.5]) > 0.0);
}

#[test]
fn cache_keys_round_to_the_1023_grid() {
    let mut cache = DistCache::default();
    let a = Vector3::repeat(512.0 / 1024.0);
    cache.insert(&a, -0.25);
    assert_eq!(cache.get(&a), Some(-0.25));
    // Neighbouring depth-10 corner lands on the same key.
    assert_eq!(cache.get(&Vector3::repeat(513.0 / 1024.0)), Some(-0.25));
    assert_eq!(cache.get(&Vector3::repeat(515.0 / 1024.0)), None);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.hits(), 2);
}

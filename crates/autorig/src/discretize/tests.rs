use super::*;
use crate::distfield::DistTree;
use crate::geom3::shapes;
use nalgebra::{vector, Vector3};
use proptest::prelude::*;

fn bar_tree() -> DistTree {
    let mesh = shapes::cuboid(vector![0.05, 0.35, 0.35], vector![0.95, 0.65, 0.65]);
    DistTree::build(&mesh, 0.01)
}

fn constant_tree(value: f64) -> DistTree {
    let mut f = move |_: &Vector3<f64>| value;
    DistTree::build_with(&mut f, 0.01, false)
}

#[test]
fn min_dot_detects_diverging_gradients() {
    let mut f = |p: &Vector3<f64>| (p - Vector3::repeat(0.5)).norm() - 0.3;
    let tree = DistTree::build_with(&mut f, 0.002, false);
    assert!(min_dot(&tree, &Vector3::repeat(0.5), 0.05) < -0.9);
    assert!(min_dot(&tree, &vector![0.5, 0.5, 0.9], 0.01) > 0.9);
    // A constant field has no usable directions.
    assert_eq!(min_dot(&constant_tree(-1.0), &Vector3::repeat(0.5), 0.1), 1.0);
}

#[test]
fn bar_medial_samples_are_inside_and_sorted() {
    let tree = bar_tree();
    let step = 0.01;
    let samples = sample_medial_surface(&tree, step);
    assert!(!samples.is_empty());
    for w in samples.windows(2) {
        assert!(w[0].radius >= w[1].radius);
    }
    for s in &samples {
        assert!(s.radius > 2.0 * step);
        // Half the bar thickness bounds every inscribed radius.
        assert!(s.radius < 0.16);
        assert!(tree.evaluate(&s.center) < 0.0);
    }
}

#[test]
fn degenerate_medial_step_samples_nothing() {
    let tree = bar_tree();
    for step in [0.0, -0.01, f64::NAN, f64::INFINITY] {
        assert!(sample_medial_surface(&tree, step).is_empty());
    }
}

#[test]
fn bar_graph_is_symmetric_and_nonempty() {
    let tree = bar_tree();
    let spheres = pack_spheres(&sample_medial_surface(&tree, 0.01), 100);
    let graph = connect_samples(&tree, &spheres);
    assert_eq!(graph.len(), spheres.len());
    assert!(graph.is_symmetric());
    if spheres.len() > 1 {
        assert!(graph.edge_count() > 0);
    }
}

#[test]
fn gabriel_test_blocks_the_long_edge() {
    let spheres = [
        Sphere::new(vector![0.2, 0.5, 0.5], 0.01),
        Sphere::new(vector![0.5, 0.5, 0.5], 0.01),
        Sphere::new(vector![0.8, 0.5, 0.5], 0.01),
    ];
    let g = connect_samples(&constant_tree(-1.0), &spheres);
    assert!(g.edges[0].contains(&1));
    assert!(g.edges[1].contains(&2));
    assert!(!g.edges[0].contains(&2));
    assert_eq!(g.edge_count(), 2);

    // Outside the surface only overlapping spheres connect.
    let g = connect_samples(&constant_tree(1.0), &spheres);
    assert_eq!(g.edge_count(), 0);
    let overlapping = [
        Sphere::new(vector![0.2, 0.5, 0.5], 0.1),
        Sphere::new(vector![0.3, 0.5, 0.5], 0.05),
    ];
    let g = connect_samples(&constant_tree(1.0), &overlapping);
    assert_eq!(g.edges[0], vec![1]);
    assert_eq!(g.edges[1], vec![0]);
}

#[test]
fn max_field_along_stops_early() {
    let mut f = |p: &Vector3<f64>| p.x - 0.5;
    let tree = DistTree::build_with(&mut f, 1e-6, false);
    let a = vector![0.0, 0.5, 0.5];
    let b = vector![1.0, 0.5, 0.5];
    assert!((max_field_along(&tree, &a, &b, 1.0) - 0.5).abs() < 1e-9);
    let early = max_field_along(&tree, &a, &b, 0.0);
    assert!(early > 0.0 && early < 0.02);
}

#[test]
fn pack_respects_budget() {
    let samples: Vec<Sphere> = (0..10)
        .map(|i| Sphere::new(vector![i as f64, 0.0, 0.0], 0.1))
        .collect();
    assert_eq!(pack_spheres(&samples, 4).len(), 4);
    assert_eq!(pack_spheres(&samples, 40).len(), 10);
    assert!(pack_spheres(&samples, 0).is_empty());
}

proptest! {
    #[test]
    fn packed_centers_avoid_earlier_spheres(
        raw in prop::collection::vec((0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0, 0.01f64..0.2), 1..60),
        max_count in 1usize..30,
    ) {
        let mut samples: Vec<Sphere> = raw
            .iter()
            .map(|&(x, y, z, r)| Sphere::new(vector![x, y, z], r))
            .collect();
        samples.sort_by(|a, b| b.radius.total_cmp(&a.radius));
        let packed = pack_spheres(&samples, max_count);
        prop_assert!(!packed.is_empty());
        prop_assert!(packed.len() <= max_count);
        for j in 1..packed.len() {
            for i in 0..j {
                let d2 = (packed[j].center - packed[i].center).norm_squared();
                prop_assert!(d2 >= packed[i].radius * packed[i].radius);
            }
        }
    }
}

//! Criterion benchmarks for distance-field construction.
//! Focus tolerances: {0.02, 0.01, 0.005}.
//! Results: by default under target/criterion.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::{vector, Vector3};
use rand::{rngs::StdRng, Rng, SeedableRng};

use autorig::distfield::{DistTree, PointDistance};
use autorig::geom3::shapes;

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("distfield");
    group.sample_size(10);
    let mesh = shapes::octahedron(Vector3::repeat(0.5), 0.45);
    let bar = shapes::cuboid(vector![0.05, 0.35, 0.35], vector![0.95, 0.65, 0.65]);
    for &tol in &[0.02f64, 0.01, 0.005] {
        group.bench_with_input(BenchmarkId::new("octahedron", tol), &tol, |b, &tol| {
            b.iter(|| DistTree::build(&mesh, tol).node_count())
        });
        group.bench_with_input(BenchmarkId::new("bar", tol), &tol, |b, &tol| {
            b.iter(|| DistTree::build(&bar, tol).node_count())
        });
    }

    let mut rng = StdRng::seed_from_u64(7);
    let cloud: Vec<Vector3<f64>> = (0..200)
        .map(|_| Vector3::from_fn(|_, _| rng.gen_range(0.2..0.8)))
        .collect();
    group.bench_function("point_cloud_0.02", |b| {
        b.iter(|| {
            let mut eval = PointDistance::new(cloud.clone());
            DistTree::build_with(&mut eval, 0.02, false).node_count()
        })
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let tree = DistTree::build(&shapes::octahedron(Vector3::repeat(0.5), 0.45), 0.005);
    let mut rng = StdRng::seed_from_u64(11);
    let pts: Vec<Vector3<f64>> = (0..1024)
        .map(|_| Vector3::from_fn(|_, _| rng.gen::<f64>()))
        .collect();
    c.bench_function("distfield/evaluate_1024", |b| {
        b.iter(|| pts.iter().map(|p| tree.evaluate(p)).sum::<f64>())
    });
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);

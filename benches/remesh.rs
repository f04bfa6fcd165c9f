//! Benchmarks for the remeshing pipeline and its hot spots.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Point3;
use voromesh::algo::spatial::PointIndex;
use voromesh::algo::voronoi::compute_sources;
use voromesh::prelude::*;

fn create_grid_mesh(n: usize) -> TriMesh {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);
    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64 / n as f64, j as f64 / n as f64, 0.0));
        }
    }
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v01 = v00 + (n + 1);
            faces.push([v00, v00 + 1, v01 + 1]);
            faces.push([v00, v01 + 1, v01]);
        }
    }
    build_from_triangles(&vertices, &faces).unwrap()
}

fn bench_spatial(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);
    let index = PointIndex::new(mesh.positions().copied().collect());
    let queries: Vec<Point3<f64>> = (0..1000)
        .map(|i| Point3::new((i % 37) as f64 / 37.0, (i % 53) as f64 / 53.0, 0.0))
        .collect();

    c.bench_function("index_k_closest_1000", |b| {
        b.iter(|| {
            for q in &queries {
                black_box(index.k_closest_within(q, 16, 0.04));
            }
        })
    });
}

fn bench_sources(c: &mut Criterion) {
    let mesh = create_grid_mesh(100);
    let seeds: Vec<VertexId> = (0..mesh.num_vertices()).step_by(97).map(VertexId::new).collect();

    c.bench_function("voronoi_sources_grid_100", |b| {
        b.iter(|| black_box(compute_sources(&mesh, &seeds)))
    });
}

fn bench_remesh(c: &mut Criterion) {
    let mesh = create_grid_mesh(40);

    let mut group = c.benchmark_group("remesh_grid_40");
    group.sample_size(10);
    for spacing in [0.1, 0.05] {
        let options = RemeshOptions::new(spacing).with_border_crease_angle(60.0);
        group.bench_with_input(BenchmarkId::from_parameter(spacing), &options, |b, options| {
            b.iter(|| black_box(remesh(&mesh, options).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_spatial, bench_sources, bench_remesh);
criterion_main!(benches);

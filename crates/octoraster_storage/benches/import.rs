use octoraster_core::prelude::*;
use octoraster_storage::{prelude::*, write_binary};
use utilities::data_sets::{sphere_octree, sphere_point_list};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn binary_import_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_import_sphere");
    for depth in [4, 5, 6].iter() {
        let mut bytes = Vec::new();
        write_binary(&sphere_octree(*depth, Rgb8::WHITE), &mut bytes).unwrap();
        let options = BinaryImportOptions {
            z_up: false,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(depth), &bytes, |b, bytes| {
            b.iter(|| read_binary(bytes.as_slice(), &options).unwrap());
        });
    }
    group.finish();
}

fn point_list_import_sphere(c: &mut Criterion) {
    let text = sphere_point_list(Rgb8::WHITE);
    c.bench_function("point_list_import_sphere", |b| {
        b.iter(|| read_point_list(black_box(&text)).unwrap());
    });
}

fn octree_visit_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("octree_visit_sphere");
    for depth in [4, 5, 6].iter() {
        let octree = sphere_octree(*depth, Rgb8::WHITE);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &octree, |b, octree| {
            b.iter(|| {
                octree.visit_preorder(&mut |visit: &VisitedNode<'_>| {
                    black_box(visit.node);

                    VisitStatus::Continue
                })
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    binary_import_sphere,
    point_list_import_sphere,
    octree_visit_sphere
);
criterion_main!(benches);

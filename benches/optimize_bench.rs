use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use mesh_vcache::algs::acmr::evaluate;
use mesh_vcache::algs::optimize::{OptimizerConfig, optimize_faces};
use mesh_vcache::topology::face::Triangle;
use mesh_vcache::topology::validation::DegenerateFacePolicy;

/// `n x n` vertex grid, quads in random order.
fn shuffled_grid(n: u32, seed: u64) -> Vec<Triangle> {
    let mut faces = Vec::new();
    for i in 0..n - 1 {
        for j in 0..n - 1 {
            let a = i * n + j;
            let (b, c) = (a + 1, a + n);
            faces.push([a, c, c + 1]);
            faces.push([a, c + 1, b]);
        }
    }
    faces.shuffle(&mut SmallRng::seed_from_u64(seed));
    faces
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("vertex_cache");
    let config = OptimizerConfig::new(DegenerateFacePolicy::Reject);

    for &n in &[16u32, 48, 128] {
        let faces = shuffled_grid(n, 0xC0FFEE);

        group.bench_with_input(BenchmarkId::new("optimize", n), &faces, |b, faces| {
            b.iter(|| {
                let out = optimize_faces(faces, &config);
                black_box(out)
            });
        });

        group.bench_with_input(BenchmarkId::new("evaluate", n), &faces, |b, faces| {
            b.iter(|| black_box(evaluate(faces, config.cache_size)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_optimize);
criterion_main!(benches);

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use quotient_linalg::{eliminate, Matrix, PowerIterationParams};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_elimination(c: &mut Criterion) {
    let mut group = c.benchmark_group("eliminate");
    let mut rng = StdRng::seed_from_u64(0);

    for n in [4, 8, 16] {
        let a = Matrix::random_int(n, n, -9, 9, &mut rng).expect("non-empty matrix");
        group.bench_with_input(BenchmarkId::new("random_int", n), &a, |b, a| {
            b.iter(|| black_box(eliminate(black_box(a))))
        });
    }
    group.finish();
}

fn bench_power_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("power_iteration");
    let params = PowerIterationParams {
        random_seed: Some(0),
        ..Default::default()
    };

    for n in [2, 3, 4] {
        // symmetric tridiagonal with distinct eigenvalues
        let a = Matrix::from_fn(n, n, |r, c| match r.abs_diff(c) {
            0 => 2.into(),
            1 => (-1).into(),
            _ => 0.into(),
        })
        .expect("non-empty matrix");
        group.bench_with_input(BenchmarkId::new("tridiagonal", n), &a, |b, a| {
            b.iter(|| black_box(a.eigenvalues_with(&params)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_elimination, bench_power_iteration);
criterion_main!(benches);

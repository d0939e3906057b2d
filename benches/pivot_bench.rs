//! Microbenchmarks for the hot FTRAN / BTRAN / pricing paths, mirroring
//! the teacher's `klu_analyze.rs` structure: build the fixture once,
//! measure the repeated hot-loop operation with `BatchSize::SmallInput`.

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

use revsimplex::basis::{BasisState, VarStatus, btran, ftran};
use revsimplex::matrix::builder::MatrixBuilder;
use revsimplex::pricing::{PricingState, PricingStrategy, scan};

/// A banded sparse n×n system (3 nonzeros per column) with an eta chain
/// of `pivots` pivots applied on top of it, used to exercise FTRAN/BTRAN
/// at a representative chain depth.
fn banded_basis(n: usize, pivots: usize) -> (BasisState, Vec<f64>) {
    let mut basis = BasisState::new(n, n);
    for i in 0..n {
        basis.basic_vars[i] = i;
        basis.var_status[i] = VarStatus::Basic(i);
    }
    for p in 0..pivots {
        let row = p % n;
        let mut col = vec![0.0; n];
        col[row] = 2.0;
        if row + 1 < n {
            col[row + 1] = 0.3;
        }
        if row >= 1 {
            col[row - 1] = -0.1;
        }
        basis
            .append_eta(row, n + p, basis.basic_vars[row], VarStatus::AtLower, &col, 1e-10)
            .unwrap();
    }
    let rhs: Vec<f64> = (0..n).map(|i| 1.0 + i as f64 * 0.01).collect();
    (basis, rhs)
}

fn bench_ftran(c: &mut Criterion) {
    let mut group = c.benchmark_group("ftran");
    for &(n, pivots) in &[(128usize, 20usize), (1024, 100)] {
        group.bench_function(format!("n={n}_pivots={pivots}"), |b| {
            b.iter_batched(
                || banded_basis(n, pivots),
                |(basis, rhs)| {
                    let mut y = rhs.clone();
                    ftran(&basis.eta_chain, &mut y);
                    y
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_btran(c: &mut Criterion) {
    let mut group = c.benchmark_group("btran");
    for &(n, pivots) in &[(128usize, 20usize), (1024, 100)] {
        group.bench_function(format!("n={n}_pivots={pivots}"), |b| {
            b.iter_batched(
                || banded_basis(n, pivots),
                |(basis, rhs)| btran(&basis.eta_chain, &rhs),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_pricing(c: &mut Criterion) {
    let mut group = c.benchmark_group("pricing");
    for &n in &[256usize, 4096] {
        group.bench_function(format!("dantzig_n={n}"), |b| {
            b.iter_batched(
                || {
                    let var_status = vec![VarStatus::AtLower; n];
                    let dj: Vec<f64> = (0..n).map(|i| ((i as f64) - n as f64 / 2.0) * 0.01).collect();
                    let state = PricingState::new(PricingStrategy::Dantzig, n);
                    (state, var_status, dj)
                },
                |(mut state, var_status, dj)| scan(&mut state, &var_status, &dj, 1e-6, 10),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("partial_n={n}"), |b| {
            b.iter_batched(
                || {
                    let var_status = vec![VarStatus::AtLower; n];
                    let dj: Vec<f64> = (0..n).map(|i| ((i as f64) - n as f64 / 2.0) * 0.01).collect();
                    let state = PricingState::new(PricingStrategy::Partial, n);
                    (state, var_status, dj)
                },
                |(mut state, var_status, dj)| scan(&mut state, &var_status, &dj, 1e-6, 10),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_matrix_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("matrix");
    let n = 2048usize;
    group.bench_function(format!("matvec_n={n}"), |b| {
        b.iter_batched(
            || {
                let mut builder = MatrixBuilder::new(n, n);
                for j in 0..n {
                    builder.push(j, j, 4.0).unwrap();
                    if j + 1 < n {
                        builder.push(j, j + 1, -1.0).unwrap();
                    }
                }
                let a = builder.build_csc().unwrap();
                let x: Vec<f64> = (0..n).map(|i| i as f64 * 0.001).collect();
                (a, x)
            },
            |(a, x)| {
                let mut y = vec![0.0; n];
                a.matvec(&x, &mut y, true);
                y
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_ftran, bench_btran, bench_pricing, bench_matrix_ops);
criterion_main!(benches);

use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::Array1;
use wristfeat::filter::{butter_lowpass, lowpass};
use wristfeat::window::featurize;

// Roughly one WESAD session of BVP: ~100 min at 64 Hz.
const N_BVP: usize = 64 * 60 * 100;

fn bvp() -> Array1<f64> {
    Array1::from_shape_fn(N_BVP, |i| {
        let t = i as f64 / 64.0;
        (2.0 * std::f64::consts::PI * 1.2 * t).sin() + 0.1 * (t * 17.0).cos()
    })
}

fn bench_design(c: &mut Criterion) {
    c.bench_function("butter_lowpass order 4", |b| {
        b.iter(|| butter_lowpass(black_box(4), black_box(1.0), black_box(64.0)).unwrap())
    });
}

fn bench_lowpass(c: &mut Criterion) {
    let x = bvp();
    c.bench_function("lowpass BVP [384000]", |b| {
        b.iter(|| {
            let y = lowpass(black_box(x.view()), 1.0, 64.0, 4).unwrap();
            black_box(y[0])
        })
    });
}

fn bench_featurize(c: &mut Criterion) {
    let x = bvp();
    c.bench_function("featurize BVP 30 s windows", |b| {
        b.iter(|| black_box(featurize(black_box(x.view()), 1920).len()))
    });
}

criterion_group!(benches, bench_design, bench_lowpass, bench_featurize);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, Criterion};
use hummingbird::ode::{integrate, integrate_into, AdaptiveSettings};
use hummingbird::{Vector, Vector2, Vector8};

fn linspace<const N: usize>(a: f64, b: f64) -> [f64; N] {
    let mut ts = [0.0; N];
    for (i, t) in ts.iter_mut().enumerate() {
        *t = a + (b - a) * i as f64 / (N - 1) as f64;
    }
    ts
}

// ---------------------------------------------------------------------------
// Scalar decay
// ---------------------------------------------------------------------------

fn decay_scalar(c: &mut Criterion) {
    let mut g = c.benchmark_group("decay_scalar");
    let ts = linspace::<64>(0.0, 10.0);

    g.bench_function("integrate_into", |b| {
        let settings = AdaptiveSettings::new(1e-10);
        let mut out = [0.0; 64];
        b.iter(|| {
            integrate_into(
                std::hint::black_box(&ts),
                1.0,
                |y: &f64, _t| -*y,
                &settings,
                &mut out,
            )
            .unwrap()
        })
    });

    g.bench_function("integrate", |b| {
        b.iter(|| integrate(std::hint::black_box(&ts), 1.0, 1e-10, |y: &f64, _t| -*y).unwrap())
    });

    g.finish();
}

// ---------------------------------------------------------------------------
// Harmonic oscillator, 2 states
// ---------------------------------------------------------------------------

fn oscillator(c: &mut Criterion) {
    let mut g = c.benchmark_group("oscillator");
    let ts = linspace::<256>(0.0, 20.0 * std::f64::consts::PI);
    let y0 = Vector2::from_array([1.0_f64, 0.0]);

    for tol in [1e-6, 1e-10] {
        g.bench_function(format!("tol={tol:e}"), |b| {
            let settings = AdaptiveSettings::new(tol);
            let mut out = [Vector2::zeros(); 256];
            b.iter(|| {
                integrate_into(
                    std::hint::black_box(&ts),
                    y0,
                    |y: &Vector2<f64>, _t| Vector2::from_array([y[1], -y[0]]),
                    &settings,
                    &mut out,
                )
                .unwrap()
            })
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------
// Decoupled linear system, 8 states
// ---------------------------------------------------------------------------

fn linear8(c: &mut Criterion) {
    let mut g = c.benchmark_group("linear8");
    let ts = linspace::<32>(0.0, 5.0);
    let y0 = Vector8::fill(1.0_f64);

    g.bench_function("integrate_into", |b| {
        let settings = AdaptiveSettings::new(1e-9);
        let mut out = [Vector::zeros(); 32];
        b.iter(|| {
            integrate_into(
                std::hint::black_box(&ts),
                y0,
                |y: &Vector8<f64>, _t| {
                    let mut d = *y;
                    for i in 0..8 {
                        d[i] = -0.5 * (i + 1) as f64 * y[i];
                    }
                    d
                },
                &settings,
                &mut out,
            )
            .unwrap()
        })
    });

    g.finish();
}

criterion_group!(benches, decay_scalar, oscillator, linear8);
criterion_main!(benches);

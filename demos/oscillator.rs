// Harmonic oscillator sampled through dense output.
// Prints JSON with 300 uniformly-sampled points on [0, 4π]:
//   {"t":[...], "x":[...], "v":[...], "evals":N, "accepted":N, "rejected":N}

use hummingbird::ode::{integrate_with, AdaptiveSettings};
use hummingbird::Vector2;

fn fmt_arr(v: &[f64]) -> String {
    let inner: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", inner.join(","))
}

fn main() {
    let tau = 4.0 * std::f64::consts::PI;
    let y0 = Vector2::from_array([1.0_f64, 0.0]);

    const N: usize = 300;
    let ts: Vec<f64> = (0..N).map(|i| tau * (i as f64) / (N - 1) as f64).collect();

    let sol = integrate_with(
        &ts,
        y0,
        |y: &Vector2<f64>, _t| Vector2::from_array([y[1], -y[0]]),
        &AdaptiveSettings::default(),
    )
    .expect("ODE integration failed");

    let x_vals: Vec<f64> = sol.states.iter().map(|y| y[0]).collect();
    let v_vals: Vec<f64> = sol.states.iter().map(|y| y[1]).collect();

    println!(
        "{{\"t\":{},\"x\":{},\"v\":{},\"evals\":{},\"accepted\":{},\"rejected\":{}}}",
        fmt_arr(&ts),
        fmt_arr(&x_vals),
        fmt_arr(&v_vals),
        sol.stats.evals,
        sol.stats.accepted,
        sol.stats.rejected
    );
}

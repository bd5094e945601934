//! AXPY three ways: a scalar loop, the `ArrayOps` kernel and its parallel
//! variant, with the tier check a shipped binary should do first.
//!
//! ```text
//! RUST_LOG=debug cargo run --release --example axpy
//! ```

use std::time::Instant;

use simdtype::cpu;
use simdtype::error::SimdError;
use simdtype::ops::ArrayOps;
use simdtype::utils::AlignedBuf;

/// `y = alpha * x + y`, the reference implementation.
fn axpy_scalar(alpha: f32, x: &[f32], y: &mut [f32]) {
    assert_eq!(x.len(), y.len(), "Vectors must have same length");
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

fn main() -> Result<(), SimdError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let tier = match cpu::check_runtime_support() {
        Ok(tier) => tier,
        Err(e) => {
            log::error!("{e}");
            return Err(e);
        }
    };
    log::info!("running with the {tier} tier");

    println!("AXPY (A*X Plus Y) Example");
    println!("========================\n");

    let alpha = 2.5f32;
    let x = vec![1.0f32, 2.0, 3.0, 4.0, 5.0];
    let mut y = vec![0.5f32, 1.0, 1.5, 2.0, 2.5];
    println!("alpha = {alpha}");
    println!("x = {x:?}");
    println!("y = {y:?}");

    f32::axpy(alpha, &x, 1.0, &mut y);
    println!("\nalpha * x + y = {y:?}");

    let len = 4 * simdtype::PARALLEL_SIMD_THRESHOLD;
    let x: Vec<f32> = (0..len).map(|i| (i % 97) as f32 * 0.01).collect();
    let mut y_scalar = AlignedBuf::<f32>::try_zeroed(len, simdtype::DEFAULT_ALIGNMENT)?;
    let mut y_simd = AlignedBuf::<f32>::zeroed(len);
    let mut y_par = AlignedBuf::<f32>::zeroed(len);

    let start = Instant::now();
    axpy_scalar(alpha, &x, &mut y_scalar);
    let scalar_time = start.elapsed();

    let start = Instant::now();
    f32::axpy(alpha, &x, 1.0, &mut y_simd);
    let simd_time = start.elapsed();

    let start = Instant::now();
    f32::par_axpy(alpha, &x, 1.0, &mut y_par);
    let par_time = start.elapsed();

    let max_diff = y_scalar
        .iter()
        .zip(y_par.iter())
        .fold(0.0f32, |m, (a, b)| m.max((a - b).abs()));

    println!("\n{len} elements:");
    println!("  scalar   {scalar_time:?}");
    println!("  simd     {simd_time:?}");
    println!("  parallel {par_time:?}");
    println!("  max |scalar - parallel| = {max_diff:e}");

    Ok(())
}

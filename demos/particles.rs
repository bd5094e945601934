//! Steps a cloud of particles stored as interleaved `(x, y, z, vx, vy, vz)`
//! records.
//!
//! Each iteration transposes eight records into six `float8` field vectors
//! with `pack`, integrates them lane-parallel and writes them back with
//! `unpack`. The floor bounce uses a comparison mask and `select`.

use simdtype::cpu;
use simdtype::error::SimdError;
use simdtype::simd::{float8, select, SimdVec};

const FIELDS: usize = 6;
const PARTICLES: usize = 1_000;
const STEPS: usize = 200;
const DT: f32 = 0.01;
const GRAVITY: f32 = -9.81;

fn step(chunk: &mut [f32]) {
    let mut f = [float8::zero(); FIELDS];
    // SAFETY: `chunk` holds `FIELDS * 8` scalars and `f` one vector per field.
    unsafe { float8::pack(FIELDS, chunk.as_ptr(), &mut f) };

    let dt = float8::splat(DT);
    f[5] += float8::splat(GRAVITY) * dt;
    for axis in 0..3 {
        f[axis] = f[axis + 3].fmuladd(dt, f[axis]);
    }

    // Reflect particles that fell through the floor.
    let below = f[2].mask_lt(float8::zero());
    f[2] = select(f[2], -f[2], below);
    f[5] = select(f[5], -f[5] * float8::splat(0.8), below);

    // SAFETY: as for `pack`.
    unsafe { float8::unpack(&f, FIELDS, chunk.as_mut_ptr()) };
}

fn step_scalar(record: &mut [f32]) {
    record[5] += GRAVITY * DT;
    for axis in 0..3 {
        record[axis] += record[axis + 3] * DT;
    }
    if record[2] < 0.0 {
        record[2] = -record[2];
        record[5] = -record[5] * 0.8;
    }
}

fn main() -> Result<(), SimdError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let tier = cpu::check_runtime_support()?;
    log::info!("{PARTICLES} particles, {STEPS} steps, float8 on the {tier} tier");

    let mut state: Vec<f32> = (0..PARTICLES)
        .flat_map(|i| {
            let t = i as f32;
            [t.sin(), t.cos(), 1.0 + (t * 0.1).sin().abs(), 0.5, -0.25, 0.0]
        })
        .collect();

    let block = FIELDS * float8::LANES;
    for _ in 0..STEPS {
        let mut blocks = state.chunks_exact_mut(block);
        for chunk in &mut blocks {
            step(chunk);
        }
        for record in blocks.into_remainder().chunks_exact_mut(FIELDS) {
            step_scalar(record);
        }
    }

    let (lowest, highest) = state
        .chunks_exact(FIELDS)
        .fold((f32::MAX, f32::MIN), |(lo, hi), r| (lo.min(r[2]), hi.max(r[2])));
    log::debug!("first record after {STEPS} steps: {:?}", &state[..FIELDS]);
    println!("height range after {STEPS} steps: [{lowest:.3}, {highest:.3}]");

    Ok(())
}

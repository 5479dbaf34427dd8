//! Benchmarks for cue synthesis.
//!
//! Run with: cargo bench
//!
//! Reference timing at 48kHz sample rate:
//!   - 128 samples  = 2.67ms deadline
//!   - 512 samples  = 10.67ms deadline
//!   - 2048 samples = 42.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Primitives (impulse synthesis, convolution, envelope, voice)
//!   - scenarios/*  Whole cues through the mix bus

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Block sizes an output callback typically asks for.
pub const BLOCK_SIZES: &[usize] = &[128, 512, 2048];

pub const SAMPLE_RATE: f32 = 48_000.0;

criterion_group!(
    benches,
    dsp::bench_impulse,
    dsp::bench_convolver,
    dsp::bench_envelope,
    dsp::bench_voice,
    scenarios::bench_cues,
);
criterion_main!(benches);

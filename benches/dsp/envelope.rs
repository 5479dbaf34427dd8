//! Benchmarks for the breakpoint gain envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cuesynth::dsp::envelope::{EnvelopeParams, GainEnvelope};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let envelope = GainEnvelope::new(1.0, &EnvelopeParams::new(0.1, 0.1, 0.5, 0.4), 0.06);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Linear ramp up
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| envelope.render(black_box(&mut buffer), 0.0, SAMPLE_RATE))
        });

        // Exponential tail
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| envelope.render(black_box(&mut buffer), 0.7, SAMPLE_RATE))
        });
    }

    group.finish();
}

//! Benchmarks for reverb impulse synthesis, which runs once per engine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cuesynth::dsp::impulse::{self, ReverbProfile};
use rand::{rngs::StdRng, SeedableRng};

use crate::SAMPLE_RATE;

pub fn bench_impulse(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/impulse");

    for duration in [0.5f32, 1.5, 3.0] {
        let profile = ReverbProfile {
            duration_seconds: duration,
            ..ReverbProfile::default()
        };
        group.bench_with_input(
            BenchmarkId::new("synthesize", format!("{duration}s")),
            &profile,
            |b, profile| {
                let mut rng = StdRng::seed_from_u64(7);
                b.iter(|| impulse::synthesize_with(&mut rng, black_box(profile), SAMPLE_RATE))
            },
        );
    }

    group.finish();
}

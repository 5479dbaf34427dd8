//! Benchmarks for the partitioned reverb convolver.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cuesynth::dsp::{
    convolver::Convolver,
    impulse::{self, ReverbProfile},
};
use rand::{rngs::StdRng, SeedableRng};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_convolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/convolver");
    let mut rng = StdRng::seed_from_u64(11);

    for &size in BLOCK_SIZES {
        // Quiet tone so the tail never settles to zero
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.1).collect();
        let mut left = input.clone();
        let mut right = input.clone();

        // Default profile: 1.5s stereo tail
        let ir = impulse::synthesize_with(&mut rng, &ReverbProfile::default(), SAMPLE_RATE);
        let mut convolver = Convolver::new(&ir);
        group.bench_with_input(BenchmarkId::new("default_tail", size), &size, |b, _| {
            b.iter(|| {
                left.copy_from_slice(&input);
                right.copy_from_slice(&input);
                convolver.process_block(black_box(&mut left), black_box(&mut right));
            })
        });

        // Long hall
        let profile = ReverbProfile {
            duration_seconds: 3.0,
            ..ReverbProfile::default()
        };
        let ir = impulse::synthesize_with(&mut rng, &profile, SAMPLE_RATE);
        let mut convolver = Convolver::new(&ir);
        group.bench_with_input(BenchmarkId::new("long_tail", size), &size, |b, _| {
            b.iter(|| {
                left.copy_from_slice(&input);
                right.copy_from_slice(&input);
                convolver.process_block(black_box(&mut left), black_box(&mut right));
            })
        });
    }

    group.finish();
}

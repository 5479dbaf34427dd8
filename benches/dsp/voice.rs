//! Benchmarks for single voice rendering: oscillator, filter, envelope, pan.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cuesynth::{
    dsp::{filter::FilterSpec, oscillator::Waveform},
    voice::{
        build_voices,
        render::{VoiceOutputs, VoicePlayer},
        VoiceSpec,
    },
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn player(spec: &VoiceSpec) -> VoicePlayer {
    let voice = build_voices(spec, 0.0, 0.5, SAMPLE_RATE)
        .into_iter()
        .next()
        .expect("spec builds at least one voice");
    VoicePlayer::new(voice, SAMPLE_RATE)
}

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/voice");

    let specs = [
        ("sine", VoiceSpec::tone(440.0, 10.0).wet()),
        (
            "saw_lowpass",
            VoiceSpec::tone(220.0, 10.0)
                .waveform(Waveform::Sawtooth)
                .filter(FilterSpec::lowpass(1_200.0)),
        ),
        ("glide", VoiceSpec::tone(880.0, 10.0).glide_to(440.0).pan(0.5)),
        (
            "noise_bandpass",
            VoiceSpec::noise(10.0).filter(FilterSpec::bandpass(2_500.0, 3.0)),
        ),
    ];

    for &size in BLOCK_SIZES {
        let mut dry_left = vec![0.0f32; size];
        let mut dry_right = vec![0.0f32; size];
        let mut wet_left = vec![0.0f32; size];
        let mut wet_right = vec![0.0f32; size];

        for (name, spec) in &specs {
            let mut player = player(spec);
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| {
                    let mut out = VoiceOutputs {
                        dry_left: &mut dry_left,
                        dry_right: &mut dry_right,
                        wet_left: &mut wet_left,
                        wet_right: &mut wet_right,
                    };
                    // Stay inside the voice's lifetime every iteration
                    player.render(black_box(size as u64), &mut out);
                })
            });
        }
    }

    group.finish();
}

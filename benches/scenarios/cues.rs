//! Benchmarks for rendering complete cues, from voice construction to the
//! compressed master bus.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use cuesynth::{
    cues::{forge, gallery, mirror, nodes, verification, Cue},
    dsp::impulse::{self, ReverbProfile},
    output::{BusSettings, Mixer},
    voice::build_voices,
};

use crate::SAMPLE_RATE;

/// Half a second at 48kHz.
const RENDER_FRAMES: usize = 24_000;

/// Mixer with the default reverb and every voice of `cue` started at its
/// offset.
fn load(cue: &Cue, ir: &impulse::StereoBuffer) -> Mixer {
    let mut mixer = Mixer::new(SAMPLE_RATE, &BusSettings::default());
    mixer.install_reverb(ir);
    for step in &cue.schedule {
        for voice in build_voices(&step.spec, step.offset_ms / 1000.0, 0.5, SAMPLE_RATE) {
            mixer.add_voice(voice).expect("cue fits in the mixer");
        }
    }
    mixer
}

pub fn bench_cues(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/cues");
    group.sample_size(20);

    let ir = impulse::synthesize(&ReverbProfile::default(), SAMPLE_RATE);
    let mut left = vec![0.0f32; RENDER_FRAMES];
    let mut right = vec![0.0f32; RENDER_FRAMES];

    let cues = [
        // 1 voice, dry
        ("node_hover", nodes::node_hover()),
        // 3 wet chord tones with 3 overtones each
        ("verification_success", verification::verification_result(true)),
        // 8 staggered echoes
        ("infinite_reflection", mirror::infinite_reflection()),
        // Filtered noise plus tones
        ("strike", forge::strike()),
        ("gallery_enter", gallery::gallery_enter()),
    ];

    for (name, cue) in &cues {
        group.bench_with_input(
            BenchmarkId::new(*name, RENDER_FRAMES),
            cue,
            |b, cue| {
                b.iter_batched(
                    || load(cue, &ir),
                    |mut mixer| mixer.render(black_box(&mut left), black_box(&mut right)),
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

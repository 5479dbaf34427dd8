use crate::{engine::SoundEngine, voice::VoiceSpec};

use super::{Cue, CueKind, TONAL_LEVEL};

const MIRROR_BASE_HZ: f32 = 587.33;
/// Slight beating between the two halves of the pair.
const MIRROR_DETUNE: f32 = 1.005;

const REFLECTIONS: usize = 8;
const REFLECTION_SPACING_MS: f64 = 120.0;
const REFLECTION_BASE_HZ: f32 = 880.0;
const REFLECTION_PITCH_DRIFT: f32 = 0.985;
const REFLECTION_DECAY: f32 = 0.75;
/// Just short of half a turn per echo: consecutive echoes land on opposite
/// sides and the swing narrows slowly toward the centre.
const REFLECTION_PAN_STEP: f32 = 2.99;
const REFLECTION_PAN_WIDTH: f32 = 0.8;

/// A tone and its slightly detuned mirror image, hard apart in the field.
pub fn mirror_activate() -> Cue {
    let half = |freq, pan| {
        VoiceSpec::tone(freq, 1.0)
            .pan(pan)
            .envelope(0.05, 0.2, 0.5, 0.6)
            .level(TONAL_LEVEL)
            .wet()
    };
    Cue::new(CueKind::MirrorActivate)
        .at(0.0, half(MIRROR_BASE_HZ, -0.5))
        .at(0.0, half(MIRROR_BASE_HZ * MIRROR_DETUNE, 0.5))
}

/// Eight echoes, each quieter and a little flatter than the last, swinging
/// from side to side.
pub fn infinite_reflection() -> Cue {
    (0..REFLECTIONS).fold(Cue::new(CueKind::InfiniteReflection), |cue, i| {
        let n = i as i32;
        cue.at(
            i as f64 * REFLECTION_SPACING_MS,
            VoiceSpec::tone(REFLECTION_BASE_HZ * REFLECTION_PITCH_DRIFT.powi(n), 0.4)
                .pan(
                    (i as f32 * REFLECTION_PAN_STEP + std::f32::consts::FRAC_PI_2).sin()
                        * REFLECTION_PAN_WIDTH,
                )
                .envelope(0.005, 0.08, 0.3, 0.25)
                .level(TONAL_LEVEL * REFLECTION_DECAY.powi(n))
                .wet(),
        )
    })
}

impl SoundEngine {
    pub fn play_mirror_activate(&mut self) -> bool {
        self.play(mirror_activate())
    }

    pub fn play_infinite_reflection(&mut self) -> bool {
        self.play(infinite_reflection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_pair_is_detuned_and_split() {
        let cue = mirror_activate();
        let freqs = cue.frequencies();
        assert_eq!(cue.offsets(), vec![0.0, 0.0]);
        assert!(freqs[1] > freqs[0] && freqs[1] / freqs[0] < 1.01);
        assert_eq!(cue.schedule[0].spec.pan, -cue.schedule[1].spec.pan);
    }

    #[test]
    fn reflections_decay_and_drift() {
        let cue = infinite_reflection();
        assert_eq!(cue.len(), 8);
        assert_eq!(cue.offsets()[7], 840.0);

        for pair in cue.schedule.windows(2) {
            let (a, b) = (&pair[0].spec, &pair[1].spec);
            assert!(b.level < a.level);
            assert!(b.frequency() < a.frequency());
            assert!(b.wet);
            assert!(a.pan * b.pan < 0.0, "{} then {}", a.pan, b.pan);
        }
        assert!((cue.schedule[0].spec.pan - 0.8).abs() < 1e-6);
        assert!(cue.schedule.iter().all(|s| s.spec.pan.abs() <= 0.8));
    }
}

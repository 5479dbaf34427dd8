use crate::{
    dsp::{filter::FilterSpec, oscillator::Waveform},
    engine::SoundEngine,
    voice::VoiceSpec,
};

use super::{Cue, CueKind, KEY_LEVEL, TONAL_LEVEL};

const KEYPRESS_THROTTLE_MS: f64 = 50.0;

/// C major: C5 E5 G5.
const SUCCESS_CHORD: [f32; 3] = [523.25, 659.25, 783.99];
const SUCCESS_STAGGER_MS: f64 = 80.0;

const FAILURE_ROOT_HZ: f32 = 233.08;
/// A minor second up.
const FAILURE_INTERVAL: f32 = 1.059;
const FAILURE_STAGGER_MS: f64 = 50.0;

/// Filtered noise click for typing.
pub fn keypress() -> Cue {
    Cue::single(
        CueKind::Keypress,
        VoiceSpec::noise(0.035)
            .filter(FilterSpec::highpass(2_000.0))
            .envelope(0.001, 0.01, 0.2, 0.02)
            .level(KEY_LEVEL),
    )
    .throttled(KEYPRESS_THROTTLE_MS)
}

/// Rising wet triad on success, a dry grinding minor second on failure.
pub fn verification_result(success: bool) -> Cue {
    if success {
        SUCCESS_CHORD.iter().enumerate().fold(
            Cue::new(CueKind::VerificationResult),
            |cue, (i, &freq)| {
                cue.at(
                    i as f64 * SUCCESS_STAGGER_MS,
                    VoiceSpec::tone(freq, 0.6)
                        .envelope(0.01, 0.1, 0.5, 0.4)
                        .level(TONAL_LEVEL)
                        .wet()
                        .with_overtones(),
                )
            },
        )
    } else {
        let buzz = |freq| {
            VoiceSpec::tone(freq, 0.4)
                .waveform(Waveform::Sawtooth)
                .filter(FilterSpec::lowpass(1_200.0))
                .envelope(0.01, 0.08, 0.4, 0.25)
                .level(TONAL_LEVEL)
        };
        Cue::new(CueKind::VerificationResult)
            .at(0.0, buzz(FAILURE_ROOT_HZ))
            .at(FAILURE_STAGGER_MS, buzz(FAILURE_ROOT_HZ * FAILURE_INTERVAL))
    }
}

impl SoundEngine {
    pub fn play_keypress(&mut self) -> bool {
        self.play(keypress())
    }

    pub fn play_verification_result(&mut self, success: bool) -> bool {
        self.play(verification_result(success))
    }
}

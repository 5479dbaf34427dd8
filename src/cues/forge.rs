//! Metalwork textures: noise shaped by filters, with a tonal core.

use crate::{
    dsp::{filter::FilterSpec, oscillator::Waveform},
    engine::SoundEngine,
    voice::VoiceSpec,
};

use super::{Cue, CueKind, NOISE_LEVEL, TONAL_LEVEL};

/// Hammer on anvil: a band-passed crack, a ringing overtone-rich tone and a
/// low thud underneath.
pub fn strike() -> Cue {
    Cue::new(CueKind::Strike)
        .at(
            0.0,
            VoiceSpec::noise(0.15)
                .filter(FilterSpec::bandpass(2_500.0, 3.0))
                .envelope(0.001, 0.04, 0.2, 0.08)
                .level(NOISE_LEVEL)
                .wet(),
        )
        .at(
            0.0,
            VoiceSpec::tone(1318.51, 0.9)
                .waveform(Waveform::Triangle)
                .envelope(0.002, 0.1, 0.3, 0.7)
                .level(TONAL_LEVEL * 0.6)
                .wet()
                .with_overtones(),
        )
        .at(
            0.0,
            VoiceSpec::tone(110.0, 0.25)
                .envelope(0.002, 0.08, 0.2, 0.15)
                .level(TONAL_LEVEL),
        )
}

/// Molten metal: slow-swelling low noise over a sinking drone.
pub fn pour() -> Cue {
    Cue::new(CueKind::Pour)
        .at(
            0.0,
            VoiceSpec::noise(1.2)
                .filter(FilterSpec::lowpass(600.0))
                .envelope(0.2, 0.3, 0.6, 0.6)
                .level(NOISE_LEVEL),
        )
        .at(
            0.0,
            VoiceSpec::tone(220.0, 1.2)
                .glide_to(165.0)
                .envelope(0.25, 0.3, 0.5, 0.6)
                .level(TONAL_LEVEL * 0.5)
                .wet(),
        )
}

/// Hot steel into water: a high sizzle and a falling whistle.
pub fn quench() -> Cue {
    Cue::new(CueKind::Quench)
        .at(
            0.0,
            VoiceSpec::noise(0.8)
                .filter(FilterSpec::highpass(3_000.0))
                .envelope(0.01, 0.1, 0.5, 0.6)
                .level(NOISE_LEVEL)
                .wet(),
        )
        .at(
            0.0,
            VoiceSpec::tone(880.0, 0.6)
                .glide_to(440.0)
                .envelope(0.01, 0.1, 0.4, 0.4)
                .level(TONAL_LEVEL * 0.4),
        )
}

impl SoundEngine {
    pub fn play_strike(&mut self) -> bool {
        self.play(strike())
    }

    pub fn play_pour(&mut self) -> bool {
        self.play(pour())
    }

    pub fn play_quench(&mut self) -> bool {
        self.play(quench())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::SourceSpec;

    fn has_filtered_noise(cue: &Cue) -> bool {
        cue.schedule
            .iter()
            .any(|s| s.spec.source == SourceSpec::Noise && s.spec.filter.is_some())
    }

    #[test]
    fn forge_cues_mix_noise_and_tone() {
        for cue in [strike(), pour(), quench()] {
            assert!(has_filtered_noise(&cue), "{:?}", cue.kind);
            assert!(!cue.frequencies().is_empty(), "{:?}", cue.kind);
            assert!(cue.offsets().iter().all(|&o| o == 0.0));
            assert!(cue.throttle_ms.is_none());
        }
    }

    #[test]
    fn pour_and_quench_glide_downward() {
        for cue in [pour(), quench()] {
            let glides = cue.schedule.iter().any(|s| {
                matches!(
                    s.spec.source,
                    SourceSpec::Tone { frequency, glide_to: Some(to), .. } if to < frequency
                )
            });
            assert!(glides, "{:?}", cue.kind);
        }
    }
}

use crate::{dsp::oscillator::Waveform, engine::SoundEngine, voice::VoiceSpec};

use super::{Cue, CueKind, HOVER_LEVEL, TONAL_LEVEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

/// C major triad in the sixth octave.
const ENTER_TRIAD: [f32; 3] = [1046.50, 1318.51, 1567.98];
const ENTER_STAGGER_MS: f64 = 100.0;

/// One pitch per spectral band, red to violet.
const DISPERSION_BANDS: [f32; 7] = [523.25, 587.33, 659.25, 783.99, 880.00, 1046.50, 1174.66];
const DISPERSION_STAGGER_MS: f64 = 60.0;

const ROTATE_THROTTLE_MS: f64 = 150.0;

pub fn light_enter() -> Cue {
    ENTER_TRIAD
        .iter()
        .enumerate()
        .fold(Cue::new(CueKind::LightEnter), |cue, (i, &freq)| {
            cue.at(
                i as f64 * ENTER_STAGGER_MS,
                VoiceSpec::tone(freq, 1.2)
                    .pan(-0.3 + 0.3 * i as f32)
                    .envelope(0.02, 0.2, 0.4, 0.8)
                    .level(TONAL_LEVEL)
                    .wet()
                    .with_overtones(),
            )
        })
}

/// White light splitting into bands, swept left to right.
pub fn dispersion() -> Cue {
    let last = (DISPERSION_BANDS.len() - 1) as f32;
    DISPERSION_BANDS
        .iter()
        .enumerate()
        .fold(Cue::new(CueKind::Dispersion), |cue, (i, &freq)| {
            cue.at(
                i as f64 * DISPERSION_STAGGER_MS,
                VoiceSpec::tone(freq, 0.6)
                    .pan(-0.9 + 1.8 * i as f32 / last)
                    .envelope(0.01, 0.1, 0.3, 0.4)
                    .level(TONAL_LEVEL * 0.8)
                    .wet(),
            )
        })
}

pub fn prism_rotate(direction: RotateDirection) -> Cue {
    let (from, to, pan) = match direction {
        RotateDirection::Clockwise => (660.0, 880.0, 0.3),
        RotateDirection::CounterClockwise => (880.0, 660.0, -0.3),
    };
    Cue::single(
        CueKind::PrismRotate,
        VoiceSpec::tone(from, 0.25)
            .waveform(Waveform::Triangle)
            .glide_to(to)
            .pan(pan)
            .envelope(0.01, 0.05, 0.5, 0.15)
            .level(HOVER_LEVEL),
    )
    .throttled(ROTATE_THROTTLE_MS)
}

impl SoundEngine {
    pub fn play_light_enter(&mut self) -> bool {
        self.play(light_enter())
    }

    pub fn play_dispersion(&mut self) -> bool {
        self.play(dispersion())
    }

    pub fn play_prism_rotate(&mut self, direction: RotateDirection) -> bool {
        self.play(prism_rotate(direction))
    }
}

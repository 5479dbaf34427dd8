use crate::{engine::SoundEngine, voice::VoiceSpec};

use super::{Cue, CueKind, TONAL_LEVEL};

/// Open voicing C4 G4 E5, spread across the field.
const ENTER_CHORD: [(f32, f32); 3] = [(261.63, -0.4), (392.00, 0.0), (659.25, 0.4)];

const CUSP_THROTTLE_MS: f64 = 120.0;
const CUSP_BASE_HZ: f32 = 330.0;
const CUSP_JUMP_RATIO: f32 = 1.5;
const CUSP_JUMP_DELAY_MS: f64 = 90.0;

/// Slow-blooming chord, all voices at once.
pub fn gallery_enter() -> Cue {
    ENTER_CHORD
        .iter()
        .fold(Cue::new(CueKind::GalleryEnter), |cue, &(freq, pan)| {
            cue.at(
                0.0,
                VoiceSpec::tone(freq, 2.0)
                    .pan(pan)
                    .envelope(0.3, 0.4, 0.5, 1.2)
                    .level(TONAL_LEVEL)
                    .wet()
                    .with_overtones(),
            )
        })
}

/// Pitch tracks the control parameter over an octave (0 → 330 Hz,
/// 1 → 660 Hz), then jumps a fifth, like the fold it illustrates.
pub fn cusp_transition(parameter: f32) -> Cue {
    let parameter = if parameter.is_finite() {
        parameter.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let freq = CUSP_BASE_HZ * 2.0f32.powf(parameter);
    let pan = parameter * 2.0 - 1.0;

    let step = |freq| {
        VoiceSpec::tone(freq, 0.3)
            .pan(pan)
            .envelope(0.01, 0.06, 0.4, 0.2)
            .level(TONAL_LEVEL * 0.7)
            .wet()
    };
    Cue::new(CueKind::CuspTransition)
        .at(0.0, step(freq))
        .at(CUSP_JUMP_DELAY_MS, step(freq * CUSP_JUMP_RATIO))
        .throttled(CUSP_THROTTLE_MS)
}

impl SoundEngine {
    pub fn play_gallery_enter(&mut self) -> bool {
        self.play(gallery_enter())
    }

    pub fn play_cusp_transition(&mut self, parameter: f32) -> bool {
        self.play(cusp_transition(parameter))
    }
}

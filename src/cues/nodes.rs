use crate::{engine::SoundEngine, voice::VoiceSpec};

use super::{Cue, CueKind, HOVER_LEVEL, TONAL_LEVEL};

const HOVER_THROTTLE_MS: f64 = 100.0;
const CLICK_STEP_MS: f64 = 40.0;
const ARPEGGIO_STEP_MS: f64 = 100.0;

/// A minor seventh: A4 C5 E5 G5.
const LATTICE_CHORD: [f32; 4] = [440.00, 523.25, 659.25, 783.99];

/// Short high tick. Fires at most every 100 ms.
pub fn node_hover() -> Cue {
    Cue::single(
        CueKind::NodeHover,
        VoiceSpec::tone(1200.0, 0.08)
            .envelope(0.005, 0.02, 0.3, 0.05)
            .level(HOVER_LEVEL),
    )
    .throttled(HOVER_THROTTLE_MS)
}

/// Two-step upward fifth.
pub fn node_click() -> Cue {
    let blip = |freq| {
        VoiceSpec::tone(freq, 0.12)
            .envelope(0.005, 0.03, 0.4, 0.08)
            .level(TONAL_LEVEL)
    };
    Cue::new(CueKind::NodeClick)
        .at(0.0, blip(880.0))
        .at(CLICK_STEP_MS, blip(1320.0))
}

pub fn lattice_activate() -> Cue {
    let spread = (LATTICE_CHORD.len() - 1) as f32;
    LATTICE_CHORD
        .iter()
        .enumerate()
        .fold(Cue::new(CueKind::LatticeActivate), |cue, (i, &freq)| {
            cue.at(
                i as f64 * ARPEGGIO_STEP_MS,
                VoiceSpec::tone(freq, 0.8)
                    .pan(-0.5 + i as f32 / spread)
                    .envelope(0.01, 0.15, 0.4, 0.5)
                    .level(TONAL_LEVEL)
                    .wet(),
            )
        })
}

impl SoundEngine {
    pub fn play_node_hover(&mut self) -> bool {
        self.play(node_hover())
    }

    pub fn play_node_click(&mut self) -> bool {
        self.play(node_click())
    }

    pub fn play_lattice_activate(&mut self) -> bool {
        self.play(lattice_activate())
    }
}

//! Master-bus dynamics compressor.
//!
//! Feed-forward, peak-detecting, stereo-linked. Levels are tracked in dB by a
//! one-pole follower (separate attack and release coefficients) and pushed
//! through a soft-knee gain curve:
//!
//! ```text
//! out dB
//!   │            ╱  1:1
//!   │          ╱
//!   │        ╱ ___───── 1:ratio
//!   │      ╱──
//!   │    ╱   ↑ knee (quadratic blend, `knee` dB wide)
//!   └──────────────→ in dB
//!          threshold
//! ```
//!
//! The defaults are the usual platform compressor defaults. They mostly stay
//! out of the way and catch chords stacked on top of reverb tails.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorSettings {
    /// dB above which gain reduction starts
    pub threshold_db: f32,
    /// Width of the soft knee in dB
    pub knee_db: f32,
    pub ratio: f32,
    /// Seconds
    pub attack: f32,
    /// Seconds
    pub release: f32,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            threshold_db: -24.0,
            knee_db: 30.0,
            ratio: 12.0,
            attack: 0.003,
            release: 0.25,
        }
    }
}

const SILENCE_DB: f32 = -120.0;

#[inline]
fn linear_to_db(linear: f32) -> f32 {
    if linear <= 1e-6 {
        SILENCE_DB
    } else {
        20.0 * linear.log10()
    }
}

#[inline]
fn db_to_linear(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

#[derive(Debug, Clone)]
pub struct Compressor {
    settings: CompressorSettings,
    attack_coef: f32,
    release_coef: f32,
    envelope_db: f32,
}

impl Compressor {
    pub fn new(settings: CompressorSettings, sample_rate: f32) -> Self {
        let settings = CompressorSettings {
            ratio: settings.ratio.max(1.0),
            knee_db: settings.knee_db.max(0.0),
            attack: settings.attack.max(1e-4),
            release: settings.release.max(1e-3),
            ..settings
        };
        Self {
            attack_coef: (-1.0 / (settings.attack * sample_rate)).exp(),
            release_coef: (-1.0 / (settings.release * sample_rate)).exp(),
            settings,
            envelope_db: SILENCE_DB,
        }
    }

    /// Gain change in dB (zero or negative) for a detector level in dB.
    pub fn gain_reduction_db(&self, level_db: f32) -> f32 {
        let CompressorSettings {
            threshold_db,
            knee_db,
            ratio,
            ..
        } = self.settings;
        let slope = 1.0 / ratio - 1.0;
        let over = level_db - threshold_db;

        if knee_db > 0.0 && 2.0 * over.abs() <= knee_db {
            let x = over + knee_db / 2.0;
            slope * x * x / (2.0 * knee_db)
        } else if over > 0.0 {
            slope * over
        } else {
            0.0
        }
    }

    #[inline]
    pub fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let level_db = linear_to_db(left.abs().max(right.abs()));

        let coef = if level_db > self.envelope_db {
            self.attack_coef
        } else {
            self.release_coef
        };
        self.envelope_db = coef * self.envelope_db + (1.0 - coef) * level_db;

        let gain = db_to_linear(self.gain_reduction_db(self.envelope_db));
        (left * gain, right * gain)
    }

    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            (*l, *r) = self.process(*l, *r);
        }
    }
}

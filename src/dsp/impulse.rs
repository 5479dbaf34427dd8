//! Procedural Reverb Impulses
//!
//! Instead of loading a recorded room response, the engine builds one from
//! noise once per session and hands it to the convolver
//! ([`crate::dsp::convolver`]). Feeding a dry voice through that convolver
//! smears it into a plausible tail.
//!
//! # Shape
//!
//! ```text
//!  amp
//!   │█▌  ▌    ▌    ▌          spikes every `spike_interval_seconds`
//!   │███▖▐▖   ▐    ▐          (50 samples wide, × `spike_gain_multiplier`)
//!   │█████▙▖  ▐▖   ▐
//!   │████████▄▟▙▄▖ ▐▖  ▖
//!   └────────────────────────→ i
//!   0                        N
//! ```
//!
//! For each channel independently and each sample `i` in `[0, N)`:
//!
//! ```text
//! decay  = (1 - i/N) ^ decay_exponent
//! spike  = spike_gain_multiplier  if i mod floor(sr × spike_interval) < 50
//!          1                      otherwise
//! sample = noise[i] × decay × spike        (noise from [`crate::dsp::noise`])
//! ```
//!
//! A higher exponent pulls energy toward the start, so the tail sounds
//! shorter and harder. The spikes stand in for discrete reflective facets.
//! This is a noise model, not a room model.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::Rng;

use crate::dsp::noise;

/// Width of each facet spike, in samples.
pub const SPIKE_WIDTH_SAMPLES: usize = 50;

/// Parameters for one synthesized impulse response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbProfile {
    pub duration_seconds: f32,
    pub decay_exponent: f32,
    pub spike_interval_seconds: f32,
    pub spike_gain_multiplier: f32,
}

impl Default for ReverbProfile {
    fn default() -> Self {
        Self {
            duration_seconds: 1.5,
            decay_exponent: 3.0,
            spike_interval_seconds: 0.1,
            spike_gain_multiplier: 1.5,
        }
    }
}

/// Two equally long channels of samples at a known rate.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoBuffer {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
    sample_rate: f32,
}

impl StereoBuffer {
    /// Silent buffer of `frames` frames.
    pub fn silent(frames: usize, sample_rate: f32) -> Self {
        Self {
            left: vec![0.0; frames],
            right: vec![0.0; frames],
            sample_rate,
        }
    }

    /// Wrap two channels. The longer channel is truncated to match.
    pub fn from_channels(mut left: Vec<f32>, mut right: Vec<f32>, sample_rate: f32) -> Self {
        let frames = left.len().min(right.len());
        left.truncate(frames);
        right.truncate(frames);
        Self {
            left,
            right,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn duration(&self) -> f32 {
        if self.sample_rate > 0.0 {
            self.len() as f32 / self.sample_rate
        } else {
            0.0
        }
    }

    /// Largest absolute sample over both channels.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(self.right.iter())
            .fold(0.0f32, |acc, &s| acc.max(s.abs()))
    }
}

/// Power-law decay factor for sample `index` of a `len`-sample impulse.
#[inline]
pub fn decay_factor(index: usize, len: usize, exponent: f32) -> f32 {
    if len == 0 {
        return 0.0;
    }
    (1.0 - index as f32 / len as f32).powf(exponent)
}

/// Facet spike gain for sample `index`. A zero period disables spikes.
#[inline]
pub fn spike_factor(index: usize, period: usize, gain: f32) -> f32 {
    if period > 0 && index % period < SPIKE_WIDTH_SAMPLES {
        gain
    } else {
        1.0
    }
}

/// Synthesize a stereo impulse for `profile` using the thread-local RNG.
pub fn synthesize(profile: &ReverbProfile, sample_rate: f32) -> StereoBuffer {
    synthesize_with(&mut rand::rng(), profile, sample_rate)
}

/// Synthesize a stereo impulse for `profile` from the supplied RNG.
///
/// The two channels draw independent noise so the tail decorrelates across
/// the stereo field.
pub fn synthesize_with<R: Rng + ?Sized>(
    rng: &mut R,
    profile: &ReverbProfile,
    sample_rate: f32,
) -> StereoBuffer {
    let period = noise::buffer_len(sample_rate, profile.spike_interval_seconds);

    let channel = |rng: &mut R| -> Vec<f32> {
        let mut samples = noise::generate_with(rng, sample_rate, profile.duration_seconds);
        let len = samples.len();
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample *= decay_factor(i, len, profile.decay_exponent)
                * spike_factor(i, period, profile.spike_gain_multiplier);
        }
        samples
    };

    let left = channel(rng);
    let right = channel(rng);
    StereoBuffer::from_channels(left, right, sample_rate)
}

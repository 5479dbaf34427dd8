//! White noise buffers.
//!
//! Every sample is drawn independently from a uniform distribution over
//! `[-1, 1]`. Short bursts of this make clicks, hisses and hammer strikes;
//! long stretches shaped by a decay curve become reverb impulses (see
//! [`crate::dsp::impulse`]).

use rand::Rng;

/// Number of frames needed to hold `duration` seconds at `sample_rate`.
///
/// Fractional frames are truncated and negative or NaN durations yield an
/// empty buffer.
pub fn buffer_len(sample_rate: f32, duration: f32) -> usize {
    let frames = sample_rate * duration;
    if frames.is_finite() && frames > 0.0 {
        frames as usize
    } else {
        0
    }
}

/// Generate `duration` seconds of uniform noise using the thread-local RNG.
pub fn generate(sample_rate: f32, duration: f32) -> Vec<f32> {
    generate_with(&mut rand::rng(), sample_rate, duration)
}

/// Generate `duration` seconds of uniform noise from the supplied RNG.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, sample_rate: f32, duration: f32) -> Vec<f32> {
    let len = buffer_len(sample_rate, duration);
    (0..len).map(|_| rng.random_range(-1.0f32..=1.0)).collect()
}

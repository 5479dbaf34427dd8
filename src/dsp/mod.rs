//! Low-level DSP primitives used by the voice builder and the output mixer.
//!
//! Everything here is plain signal math: buffers in, buffers out. Nothing
//! knows about cues, throttling or engine state, so the pieces can be tested
//! and benchmarked on their own.

/// Stereo dynamics compressor for the master bus.
pub mod compressor;
/// Uniformly partitioned FFT convolution (the shared reverb unit).
pub mod convolver;
/// ADSR breakpoint shaping and gain automation.
pub mod envelope;
/// State-variable filter for shaping noise textures.
pub mod filter;
/// Procedural stereo impulse responses.
pub mod impulse;
/// Uniform white-noise buffers.
pub mod noise;
/// Periodic waveforms.
pub mod oscillator;
/// Equal-power stereo placement.
pub mod pan;

pub use envelope::{EnvelopeParams, GainEnvelope};
pub use impulse::{ReverbProfile, StereoBuffer};

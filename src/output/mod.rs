//! The output boundary.
//!
//! The engine builds voices; something else has to play them. An
//! [`OutputBackend`] knows how to acquire a context (a sound card stream, or
//! an in-memory renderer for tests), and the [`OutputContext`] it returns
//! exposes the handful of things the engine needs: a sample rate, a clock,
//! suspend/resume state, a slot for the shared reverb impulse, and a way to
//! hand over finished voices.
//!
//! Both concrete contexts drive the same [`Mixer`].

mod mixer;
pub mod offline;

#[cfg(feature = "rtrb")]
pub mod device;

use thiserror::Error;

use crate::dsp::{compressor::CompressorSettings, impulse::StereoBuffer};
use crate::voice::Voice;

pub use mixer::{Mixer, MAX_VOICES};
pub use offline::{OfflineBackend, OfflineHandle};

#[cfg(feature = "rtrb")]
pub use device::DeviceBackend;

/// Lifecycle of an output context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Created but not producing audio, waiting on `resume()`.
    Suspended,
    Running,
    Closed,
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("no output device available")]
    NoDevice,

    #[error("failed to query the default output config")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("output unavailable: {0}")]
    Unavailable(String),

    #[error("output context is closed")]
    Closed,
}

/// Master bus processing shared by every voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusSettings {
    /// Linear gain applied after the reverb return is summed in.
    pub gain: f32,
    pub compressor: CompressorSettings,
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            gain: 0.8,
            compressor: CompressorSettings::default(),
        }
    }
}

/// A live audio output the engine can schedule voices on.
pub trait OutputContext {
    fn sample_rate(&self) -> f32;

    /// Seconds elapsed on the output clock.
    fn current_time(&self) -> f64;

    fn state(&self) -> ContextState;

    /// Ask a suspended context to start running.
    fn resume(&mut self) -> Result<(), OutputError>;

    /// Replace the shared reverb impulse.
    fn install_reverb(&mut self, impulse: StereoBuffer);

    /// Hand a voice to the output. The engine keeps no reference to it.
    fn start_voice(&mut self, voice: Voice);

    /// Total voices handed over since the context opened.
    fn voices_started(&self) -> usize;
}

/// Acquires an [`OutputContext`]. Acquisition is the engine's only fallible
/// step.
pub trait OutputBackend {
    fn open(&mut self, bus: &BusSettings) -> Result<Box<dyn OutputContext>, OutputError>;
}

//! Engine configuration.
//!
//! Everything here is fixed for the lifetime of an engine except
//! `master_volume`, which `SoundEngine::set_master_volume` can change later.
//! Cue constants (pitches, staggers, envelopes) are not configurable.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use thiserror::Error;

use crate::{
    dsp::{compressor::CompressorSettings, impulse::ReverbProfile},
    output::BusSettings,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Scales every voice's peak level, 0..=1.
    pub master_volume: f32,
    /// Linear gain on the master bus, before the compressor.
    pub bus_gain: f32,
    pub reverb: ReverbProfile,
    pub compressor: CompressorSettings,
    /// Whether cues are enabled before anyone calls `set_enabled`.
    pub start_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            master_volume: 0.5,
            bus_gain: 0.8,
            reverb: ReverbProfile::default(),
            compressor: CompressorSettings::default(),
            start_enabled: true,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid engine config")]
    Parse(#[from] toml::de::Error),
}

impl EngineConfig {
    /// Parse a (possibly partial) TOML document. Missing keys keep their
    /// defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn bus(&self) -> BusSettings {
        BusSettings {
            gain: self.bus_gain,
            compressor: self.compressor,
        }
    }
}

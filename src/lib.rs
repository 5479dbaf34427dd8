pub mod config;
pub mod cues; // Named UI sound effects
pub mod dsp;
pub mod engine; // Lifecycle, throttling, stagger scheduling
pub mod output; // Output contexts and the shared mix bus
pub mod voice; // Per-invocation signal paths

pub use config::EngineConfig;
pub use cues::{Cue, CueKind, RotateDirection};
pub use engine::{SoundEngine, UserGesture};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;

//! Real-world scenario benchmarks.
//!
//! Whole cues rendered through the mix bus, reverb included.

mod cues;

pub use cues::bench_cues;

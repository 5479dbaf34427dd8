//! Benchmarks for low-level DSP primitives.

mod convolver;
mod envelope;
mod impulse;
mod voice;

pub use convolver::bench_convolver;
pub use envelope::bench_envelope;
pub use impulse::bench_impulse;
pub use voice::bench_voice;

//! In-memory output: renders on demand instead of on a device clock.
//!
//! The engine takes its backend by value, so callers that want the audio
//! take an [`OfflineHandle`] first. The handle sees whichever mixer the
//! backend opens later and pulls frames out of it, which is what tests and
//! benchmarks want.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::{
    dsp::impulse::StereoBuffer,
    output::{BusSettings, ContextState, Mixer, OutputBackend, OutputContext, OutputError},
    voice::Voice,
    DEFAULT_SAMPLE_RATE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Availability {
    Running,
    Suspended,
    Unavailable,
}

type SharedMixer = Arc<Mutex<Mixer>>;

pub struct OfflineBackend {
    availability: Availability,
    handle: OfflineHandle,
}

impl OfflineBackend {
    /// Context opens running.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            availability: Availability::Running,
            handle: OfflineHandle {
                sample_rate,
                slot: Arc::new(Mutex::new(None)),
            },
        }
    }

    /// Context opens suspended and waits for `resume()`.
    pub fn suspended(sample_rate: f32) -> Self {
        Self {
            availability: Availability::Suspended,
            ..Self::new(sample_rate)
        }
    }

    /// Every `open` fails, like a platform without audio output.
    pub fn unavailable() -> Self {
        Self {
            availability: Availability::Unavailable,
            ..Self::new(DEFAULT_SAMPLE_RATE)
        }
    }

    /// Handle onto the mixer this backend opens, now or later.
    pub fn handle(&self) -> OfflineHandle {
        self.handle.clone()
    }
}

impl Default for OfflineBackend {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

/// Pulls audio out of an [`OfflineBackend`]'s context from outside the
/// engine. Clones share the same context.
#[derive(Clone)]
pub struct OfflineHandle {
    sample_rate: f32,
    slot: Arc<Mutex<Option<SharedMixer>>>,
}

impl OfflineHandle {
    /// Whether the backend has opened a context yet.
    pub fn is_open(&self) -> bool {
        lock(&self.slot).is_some()
    }

    /// Render `frames` frames from the opened context, advancing its clock.
    /// Silent if nothing has been opened.
    pub fn render(&self, frames: usize) -> StereoBuffer {
        let mut out = StereoBuffer::silent(frames, self.sample_rate);
        let Some(shared) = lock(&self.slot).clone() else {
            return out;
        };

        let mut mixer = lock(&shared);
        mixer.render(&mut out.left, &mut out.right);
        mixer.take_retired().for_each(drop);
        out
    }

    fn install(&self, mixer: SharedMixer) {
        *lock(&self.slot) = Some(mixer);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl OutputBackend for OfflineBackend {
    fn open(&mut self, bus: &BusSettings) -> Result<Box<dyn OutputContext>, OutputError> {
        let state = match self.availability {
            Availability::Unavailable => {
                return Err(OutputError::Unavailable(
                    "offline backend configured as unavailable".into(),
                ))
            }
            Availability::Suspended => ContextState::Suspended,
            Availability::Running => ContextState::Running,
        };

        let mixer = Arc::new(Mutex::new(Mixer::new(self.handle.sample_rate, bus)));
        self.handle.install(mixer.clone());
        Ok(Box::new(OfflineContext { mixer, state }))
    }
}

struct OfflineContext {
    mixer: SharedMixer,
    state: ContextState,
}

impl OutputContext for OfflineContext {
    fn sample_rate(&self) -> f32 {
        lock(&self.mixer).sample_rate()
    }

    fn current_time(&self) -> f64 {
        lock(&self.mixer).time()
    }

    fn state(&self) -> ContextState {
        self.state
    }

    fn resume(&mut self) -> Result<(), OutputError> {
        match self.state {
            ContextState::Closed => Err(OutputError::Closed),
            _ => {
                self.state = ContextState::Running;
                Ok(())
            }
        }
    }

    fn install_reverb(&mut self, impulse: StereoBuffer) {
        lock(&self.mixer).install_reverb(&impulse);
    }

    fn start_voice(&mut self, voice: Voice) {
        if lock(&self.mixer).add_voice(voice).is_err() {
            warn!("offline mixer full, dropping voice");
        }
    }

    fn voices_started(&self) -> usize {
        lock(&self.mixer).voices_started()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::{build_voices, VoiceSpec};

    #[test]
    fn unavailable_backend_refuses_to_open() {
        let mut backend = OfflineBackend::unavailable();
        assert!(matches!(
            backend.open(&BusSettings::default()),
            Err(OutputError::Unavailable(_))
        ));
        assert!(!backend.handle().is_open());
    }

    #[test]
    fn suspended_context_resumes() {
        let mut backend = OfflineBackend::suspended(8_000.0);
        let mut ctx = match backend.open(&BusSettings::default()) {
            Ok(ctx) => ctx,
            Err(err) => panic!("open failed: {err}"),
        };
        assert_eq!(ctx.state(), ContextState::Suspended);
        assert!(ctx.resume().is_ok());
        assert_eq!(ctx.state(), ContextState::Running);
    }

    #[test]
    fn render_advances_the_context_clock() {
        let mut backend = OfflineBackend::new(8_000.0);
        let handle = backend.handle();
        let mut ctx = match backend.open(&BusSettings::default()) {
            Ok(ctx) => ctx,
            Err(err) => panic!("open failed: {err}"),
        };

        for voice in build_voices(&VoiceSpec::tone(440.0, 0.1), ctx.current_time(), 1.0, 8_000.0) {
            ctx.start_voice(voice);
        }
        let audio = handle.render(4_000);

        assert_eq!(audio.len(), 4_000);
        assert!(audio.peak() > 0.0);
        assert!((ctx.current_time() - 0.5).abs() < 1e-9);
        assert_eq!(ctx.voices_started(), 1);
    }

    #[test]
    fn handle_taken_before_open_sees_the_context() {
        let mut backend = OfflineBackend::new(8_000.0);
        let handle = backend.handle();
        assert!(!handle.is_open());
        assert!(handle.render(100).left.iter().all(|&s| s == 0.0));

        let mut ctx = match backend.open(&BusSettings::default()) {
            Ok(ctx) => ctx,
            Err(err) => panic!("open failed: {err}"),
        };
        assert!(handle.clone().is_open());

        for voice in build_voices(&VoiceSpec::tone(440.0, 0.1), 0.0, 1.0, 8_000.0) {
            ctx.start_voice(voice);
        }
        assert!(handle.render(800).peak() > 0.0);
        assert_eq!(ctx.current_time(), 0.1);
    }
}

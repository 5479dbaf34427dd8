//! Engine lifecycle.
//!
//! A [`SoundEngine`] is constructed inert and activated later with
//! [`SoundEngine::initialize`], which takes a [`UserGesture`] token: most
//! platforms refuse to open audio output until the user has interacted with
//! the page or window, so only gesture handlers should be able to mint one.
//!
//! Until activation succeeds (and whenever the engine is disabled) every cue
//! is a silent no-op. Failing to open output is not an error for callers:
//! it is logged, the engine disables itself, and the UI carries on in
//! silence.
//!
//! The engine is an explicit handle. UI components that make sounds receive
//! a `&mut SoundEngine` (or share one through `Rc<RefCell<_>>`) rather than
//! reaching for a global.

pub mod clock;
pub mod scheduler;
pub mod throttle;

use tracing::{debug, info, warn};

use crate::{
    config::EngineConfig,
    cues::Cue,
    dsp::impulse,
    output::{ContextState, OutputBackend, OutputContext},
    voice::{build_voices, VoiceSpec},
};

pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::{PendingVoice, Scheduler};
pub use throttle::CueThrottle;

/// Proof that the caller is running inside a user-gesture handler.
#[derive(Debug)]
pub struct UserGesture {
    _private: (),
}

impl UserGesture {
    /// Call only from code reacting to a click, key press or touch.
    pub fn confirmed() -> Self {
        Self { _private: () }
    }
}

pub struct SoundEngine {
    backend: Box<dyn OutputBackend>,
    context: Option<Box<dyn OutputContext>>,
    clock: Box<dyn Clock>,
    config: EngineConfig,
    initialized: bool,
    unavailable: bool,
    enabled: bool,
    master_volume: f32,
    throttle: CueThrottle,
    scheduler: Scheduler,
}

impl SoundEngine {
    pub fn new(backend: impl OutputBackend + 'static, config: EngineConfig) -> Self {
        Self::with_clock(backend, config, SystemClock::new())
    }

    pub fn with_clock(
        backend: impl OutputBackend + 'static,
        config: EngineConfig,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            backend: Box::new(backend),
            context: None,
            clock: Box::new(clock),
            initialized: false,
            unavailable: false,
            enabled: config.start_enabled,
            master_volume: clamp_volume(config.master_volume),
            config,
            throttle: CueThrottle::new(),
            scheduler: Scheduler::new(),
        }
    }

    /// Open the output context and build the shared reverb unit.
    ///
    /// Idempotent. If output cannot be opened the engine disables itself and
    /// never tries again.
    pub fn initialize(&mut self, _gesture: UserGesture) {
        if self.initialized || self.unavailable {
            return;
        }

        let mut context = match self.backend.open(&self.config.bus()) {
            Ok(context) => context,
            Err(err) => {
                warn!(%err, "audio output unavailable, cues will be silent");
                self.unavailable = true;
                self.enabled = false;
                return;
            }
        };

        let sample_rate = context.sample_rate();
        let reverb = impulse::synthesize(&self.config.reverb, sample_rate);
        info!(
            sample_rate,
            reverb_seconds = reverb.duration(),
            state = ?context.state(),
            "sound engine initialized"
        );
        context.install_reverb(reverb);

        self.context = Some(context);
        self.initialized = true;
    }

    /// Resume a suspended output context. No-op otherwise.
    pub fn resume(&mut self) {
        let Some(context) = self.context.as_mut() else {
            return;
        };
        if context.state() != ContextState::Suspended {
            return;
        }
        match context.resume() {
            Ok(()) => debug!("output context resumed"),
            Err(err) => warn!(%err, "failed to resume output context"),
        }
    }

    /// Voices already playing are left to finish.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            debug!(enabled, "sound engine toggled");
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Output failed to open; the engine stays silent for good.
    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    /// Whether a cue played now would make sound.
    pub fn is_active(&self) -> bool {
        self.enabled && self.initialized && self.context.is_some()
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Clamped to `[0, 1]`. Only affects voices built afterwards.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = clamp_volume(volume);
    }

    pub fn context_state(&self) -> Option<ContextState> {
        self.context.as_ref().map(|c| c.state())
    }

    /// Voices handed to the output since initialization.
    pub fn voices_started(&self) -> usize {
        self.context.as_ref().map_or(0, |c| c.voices_started())
    }

    /// Stagger entries still waiting for their due time.
    pub fn pending(&self) -> usize {
        self.scheduler.len()
    }

    /// Fire a cue: check its throttle, build the voices due now and queue the
    /// rest. Returns whether the cue fired.
    pub fn play(&mut self, cue: Cue) -> bool {
        if !self.is_active() {
            return false;
        }

        let now = self.clock.now_ms();
        if let Some(min_interval) = cue.throttle_ms {
            if !self.throttle.should_fire(cue.kind, min_interval, now) {
                debug!(cue = cue.kind.name(), "cue throttled");
                return false;
            }
        }

        for step in cue.schedule {
            if step.offset_ms <= 0.0 {
                self.build_voice(&step.spec);
            } else {
                self.scheduler.enqueue(now + step.offset_ms, step.spec);
            }
        }
        true
    }

    /// Build stagger entries whose time has come. Call from the frame loop.
    pub fn update(&mut self) {
        let now = self.clock.now_ms();
        match self.scheduler.next_due() {
            Some(due) if due <= now => {}
            _ => return,
        }
        for pending in self.scheduler.drain_due(now) {
            self.build_voice(&pending.spec);
        }
    }

    /// Build `spec` (and its overtones) starting now. Returns how many
    /// voices were started; zero while inactive.
    pub fn build_voice(&mut self, spec: &VoiceSpec) -> usize {
        if !(self.enabled && self.initialized) {
            return 0;
        }
        let Some(context) = self.context.as_mut() else {
            return 0;
        };

        let voices = build_voices(
            spec,
            context.current_time(),
            self.master_volume,
            context.sample_rate(),
        );
        let count = voices.len();
        for voice in voices {
            context.start_voice(voice);
        }
        count
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cues::CueKind, output::OfflineBackend};

    fn engine(clock: &ManualClock) -> SoundEngine {
        let config = EngineConfig {
            reverb: impulse::ReverbProfile {
                duration_seconds: 0.1,
                ..Default::default()
            },
            ..Default::default()
        };
        SoundEngine::with_clock(OfflineBackend::new(8_000.0), config, clock.clone())
    }

    #[test]
    fn inert_until_initialized() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);

        assert!(engine.is_enabled());
        assert!(!engine.is_active());
        assert_eq!(engine.build_voice(&VoiceSpec::tone(440.0, 0.1)), 0);
        assert!(!engine.play(Cue::single(CueKind::NodeClick, VoiceSpec::tone(440.0, 0.1))));
    }

    #[test]
    fn initialize_is_idempotent() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);

        engine.initialize(UserGesture::confirmed());
        engine.initialize(UserGesture::confirmed());
        assert!(engine.is_active());
        assert_eq!(engine.context_state(), Some(ContextState::Running));
    }

    #[test]
    fn unavailable_output_disables_quietly() {
        let mut engine = SoundEngine::new(OfflineBackend::unavailable(), EngineConfig::default());
        engine.initialize(UserGesture::confirmed());

        assert!(!engine.is_initialized());
        assert!(!engine.is_enabled());
        assert_eq!(engine.build_voice(&VoiceSpec::tone(440.0, 0.1)), 0);

        // Re-enabling does not revive a context that never opened
        engine.set_enabled(true);
        engine.initialize(UserGesture::confirmed());
        assert!(!engine.is_active());
    }

    #[test]
    fn master_volume_is_clamped() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);

        engine.set_master_volume(1.7);
        assert_eq!(engine.master_volume(), 1.0);
        engine.set_master_volume(-0.2);
        assert_eq!(engine.master_volume(), 0.0);
        engine.set_master_volume(f32::NAN);
        assert_eq!(engine.master_volume(), 0.0);
    }

    #[test]
    fn staggered_voices_wait_for_update() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);
        engine.initialize(UserGesture::confirmed());

        let cue = Cue::new(CueKind::LatticeActivate)
            .at(0.0, VoiceSpec::tone(220.0, 0.1))
            .at(100.0, VoiceSpec::tone(330.0, 0.1));
        assert!(engine.play(cue));
        assert_eq!(engine.voices_started(), 1);
        assert_eq!(engine.pending(), 1);

        clock.advance(99.0);
        engine.update();
        assert_eq!(engine.voices_started(), 1);

        clock.advance(1.0);
        engine.update();
        assert_eq!(engine.voices_started(), 2);
        assert_eq!(engine.pending(), 0);
    }

    #[test]
    fn disabling_drops_due_entries_silently() {
        let clock = ManualClock::new();
        let mut engine = engine(&clock);
        engine.initialize(UserGesture::confirmed());

        let cue = Cue::new(CueKind::LatticeActivate).at(50.0, VoiceSpec::tone(330.0, 0.1));
        assert!(engine.play(cue));
        engine.set_enabled(false);

        clock.advance(60.0);
        engine.update();
        assert_eq!(engine.voices_started(), 0);
        assert_eq!(engine.pending(), 0);
    }

    #[test]
    fn suspended_context_resumes_on_request() {
        let mut engine = SoundEngine::new(OfflineBackend::suspended(8_000.0), EngineConfig::default());
        engine.resume();
        assert_eq!(engine.context_state(), None);

        engine.initialize(UserGesture::confirmed());
        assert_eq!(engine.context_state(), Some(ContextState::Suspended));
        engine.resume();
        assert_eq!(engine.context_state(), Some(ContextState::Running));
    }
}

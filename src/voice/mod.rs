//! Voice construction.
//!
//! A [`VoiceSpec`] is what a cue asks for: a source, a place in the stereo
//! field, a duration, an envelope, a level and a routing choice. Building it
//! against the current master volume and output clock yields one or more
//! immutable [`Voice`]s, the fundamental first and then any overtone layer.
//!
//! ```text
//! source ─→ [filter] ─→ pan ─→ envelope ─┬─────── ×0.75 ──→ master bus
//!                                        └─ wet ─ ×0.25 ──→ reverb bus
//! ```
//!
//! Once handed to an output context the engine never sees a voice again; it
//! stops itself at `start + duration`.

pub mod render;

use std::sync::Arc;

use crate::dsp::{
    envelope::{EnvelopeParams, GainEnvelope},
    filter::FilterSpec,
    noise,
    oscillator::Waveform,
    pan::clamp_pan,
};

pub use render::VoicePlayer;

/// Dry weight of a voice that sends to the reverb.
pub const DRY_WEIGHT: f32 = 0.75;
/// Wet weight of a voice that sends to the reverb.
pub const WET_WEIGHT: f32 = 0.25;

/// One row of the harmonic stack layered over a fundamental.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overtone {
    pub multiple: u8,
    pub amplitude: f32,
    pub duration: f32,
}

/// `(×2, 0.3, 0.7) (×3, 0.15, 0.5) (×4, 0.08, 0.3)`: frequency multiple,
/// amplitude scale and duration fraction relative to the fundamental.
pub const OVERTONES: [Overtone; 3] = [
    Overtone {
        multiple: 2,
        amplitude: 0.3,
        duration: 0.7,
    },
    Overtone {
        multiple: 3,
        amplitude: 0.15,
        duration: 0.5,
    },
    Overtone {
        multiple: 4,
        amplitude: 0.08,
        duration: 0.3,
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceSpec {
    Tone {
        frequency: f32,
        waveform: Waveform,
        /// Exponential glide target reached at the end of the voice.
        glide_to: Option<f32>,
    },
    Noise,
}

/// A request for one voice, before master volume and timing are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSpec {
    pub source: SourceSpec,
    pub duration: f32,
    pub pan: f32,
    pub envelope: EnvelopeParams,
    /// Base peak level before master volume.
    pub level: f32,
    pub wet: bool,
    pub overtones: bool,
    pub filter: Option<FilterSpec>,
}

impl VoiceSpec {
    /// Centred sine at `frequency`, dry, default envelope.
    pub fn tone(frequency: f32, duration: f32) -> Self {
        Self {
            source: SourceSpec::Tone {
                frequency,
                waveform: Waveform::Sine,
                glide_to: None,
            },
            duration,
            pan: 0.0,
            envelope: EnvelopeParams::default(),
            level: 0.06,
            wet: false,
            overtones: false,
            filter: None,
        }
    }

    /// Centred white-noise burst, dry, default envelope.
    pub fn noise(duration: f32) -> Self {
        Self {
            source: SourceSpec::Noise,
            ..Self::tone(0.0, duration)
        }
    }

    pub fn pan(mut self, pan: f32) -> Self {
        self.pan = pan;
        self
    }

    pub fn envelope(mut self, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        self.envelope = EnvelopeParams::new(attack, decay, sustain, release);
        self
    }

    pub fn level(mut self, level: f32) -> Self {
        self.level = level;
        self
    }

    pub fn wet(mut self) -> Self {
        self.wet = true;
        self
    }

    pub fn with_overtones(mut self) -> Self {
        self.overtones = true;
        self
    }

    /// Ignored by noise sources.
    pub fn waveform(mut self, waveform: Waveform) -> Self {
        if let SourceSpec::Tone { waveform: w, .. } = &mut self.source {
            *w = waveform;
        }
        self
    }

    /// Ignored by noise sources.
    pub fn glide_to(mut self, target: f32) -> Self {
        if let SourceSpec::Tone { glide_to, .. } = &mut self.source {
            *glide_to = Some(target);
        }
        self
    }

    pub fn filter(mut self, filter: FilterSpec) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn frequency(&self) -> Option<f32> {
        match self.source {
            SourceSpec::Tone { frequency, .. } => Some(frequency),
            SourceSpec::Noise => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Source {
    Tone {
        frequency: f32,
        waveform: Waveform,
        glide_to: Option<f32>,
    },
    Noise(Arc<[f32]>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Routing {
    Dry,
    Split { dry: f32, wet: f32 },
}

impl Routing {
    fn for_spec(wet: bool) -> Self {
        if wet {
            Routing::Split {
                dry: DRY_WEIGHT,
                wet: WET_WEIGHT,
            }
        } else {
            Routing::Dry
        }
    }

    /// `(dry, wet)` weights.
    pub fn weights(&self) -> (f32, f32) {
        match *self {
            Routing::Dry => (1.0, 0.0),
            Routing::Split { dry, wet } => (dry, wet),
        }
    }
}

/// A scheduled, immutable sound instance.
#[derive(Debug, Clone)]
pub struct Voice {
    source: Source,
    start: f64,
    duration: f32,
    pan: f32,
    envelope: GainEnvelope,
    routing: Routing,
    filter: Option<FilterSpec>,
    harmonic: u8,
}

impl Voice {
    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn frequency(&self) -> Option<f32> {
        match self.source {
            Source::Tone { frequency, .. } => Some(frequency),
            Source::Noise(_) => None,
        }
    }

    /// Start time in seconds on the output clock.
    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.start + self.duration as f64
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Effective (clamped) stereo position.
    pub fn pan(&self) -> f32 {
        self.pan
    }

    pub fn envelope(&self) -> &GainEnvelope {
        &self.envelope
    }

    pub fn peak(&self) -> f32 {
        self.envelope.peak()
    }

    pub fn routing(&self) -> Routing {
        self.routing
    }

    pub fn is_wet(&self) -> bool {
        matches!(self.routing, Routing::Split { .. })
    }

    pub fn filter(&self) -> Option<&FilterSpec> {
        self.filter.as_ref()
    }

    /// 1 for a fundamental, otherwise the overtone multiple.
    pub fn harmonic(&self) -> u8 {
        self.harmonic
    }

    pub fn is_overtone(&self) -> bool {
        self.harmonic > 1
    }
}

/// Build the voices for `spec` starting at `start` seconds on the output
/// clock. The fundamental is first, followed by the overtone layer.
pub fn build_voices(spec: &VoiceSpec, start: f64, master_volume: f32, sample_rate: f32) -> Vec<Voice> {
    let mut voices = Vec::with_capacity(if spec.overtones { 4 } else { 1 });
    build_into(&mut voices, spec, start, master_volume, sample_rate, 1);
    voices
}

fn build_into(
    voices: &mut Vec<Voice>,
    spec: &VoiceSpec,
    start: f64,
    master_volume: f32,
    sample_rate: f32,
    harmonic: u8,
) {
    let duration = if spec.duration.is_finite() {
        spec.duration.max(0.0)
    } else {
        0.0
    };
    let peak = spec.level * master_volume;

    let source = match spec.source {
        SourceSpec::Tone {
            frequency,
            waveform,
            glide_to,
        } => Source::Tone {
            frequency,
            waveform,
            glide_to,
        },
        SourceSpec::Noise => Source::Noise(noise::generate(sample_rate, duration).into()),
    };

    voices.push(Voice {
        source,
        start,
        duration,
        pan: clamp_pan(spec.pan),
        envelope: GainEnvelope::new(duration, &spec.envelope, peak),
        routing: Routing::for_spec(spec.wet),
        filter: spec.filter,
        harmonic,
    });

    let SourceSpec::Tone {
        frequency,
        waveform,
        glide_to,
    } = spec.source
    else {
        return;
    };
    if !spec.overtones {
        return;
    }

    for overtone in OVERTONES {
        let multiple = overtone.multiple as f32;
        let layer = VoiceSpec {
            source: SourceSpec::Tone {
                frequency: frequency * multiple,
                waveform,
                glide_to: glide_to.map(|f| f * multiple),
            },
            duration: duration * overtone.duration,
            level: spec.level * overtone.amplitude,
            wet: false,
            overtones: false,
            ..spec.clone()
        };
        build_into(
            voices,
            &layer,
            start,
            master_volume,
            sample_rate,
            overtone.multiple,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48_000.0;

    #[test]
    fn pan_is_clamped_on_build() {
        for (requested, effective) in [(-4.0, -1.0), (0.3, 0.3), (1.7, 1.0)] {
            let voices = build_voices(&VoiceSpec::tone(440.0, 0.2).pan(requested), 0.0, 1.0, SR);
            assert_eq!(voices[0].pan(), effective);
        }
    }

    #[test]
    fn peak_scales_with_master_volume() {
        let spec = VoiceSpec::tone(440.0, 0.2).level(0.06);
        let voices = build_voices(&spec, 0.0, 0.5, SR);
        assert!((voices[0].peak() - 0.03).abs() < 1e-6);
    }

    #[test]
    fn overtones_stack_three_dry_harmonics() {
        let spec = VoiceSpec::tone(220.0, 1.0).wet().with_overtones();
        let voices = build_voices(&spec, 2.0, 1.0, SR);

        assert_eq!(voices.len(), 4);
        assert!(voices[0].is_wet());
        assert_eq!(voices[0].harmonic(), 1);

        let fundamental_peak = voices[0].peak();
        for (voice, overtone) in voices[1..].iter().zip(OVERTONES) {
            let multiple = overtone.multiple as f32;
            assert_eq!(voice.frequency(), Some(220.0 * multiple));
            assert!((voice.duration() - overtone.duration).abs() < 1e-6);
            assert!((voice.peak() - fundamental_peak * overtone.amplitude).abs() < 1e-6);
            assert!(!voice.is_wet());
            assert_eq!(voice.start(), 2.0);
        }
    }

    #[test]
    fn overtone_table_is_strictly_decreasing() {
        for pair in OVERTONES.windows(2) {
            assert!(pair[0].multiple < pair[1].multiple);
            assert!(pair[0].amplitude > pair[1].amplitude);
            assert!(pair[0].duration >= pair[1].duration);
        }
    }

    #[test]
    fn noise_ignores_overtones_and_fills_its_buffer() {
        let voices = build_voices(&VoiceSpec::noise(0.05).with_overtones(), 0.0, 1.0, SR);
        assert_eq!(voices.len(), 1);
        match voices[0].source() {
            Source::Noise(buffer) => assert_eq!(buffer.len(), 2_400),
            other => panic!("expected noise, got {other:?}"),
        }
    }

    #[test]
    fn split_routing_uses_fixed_weights() {
        let voices = build_voices(&VoiceSpec::tone(440.0, 0.1).wet(), 0.0, 1.0, SR);
        assert_eq!(voices[0].routing().weights(), (DRY_WEIGHT, WET_WEIGHT));
        assert_eq!(Routing::Dry.weights(), (1.0, 0.0));
    }
}

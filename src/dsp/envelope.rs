#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
ADSR Gain Automation
====================

A cue voice is fire-and-forget: its whole life (start, stop, and every gain
change in between) is known the moment it is built. So instead of a gate-
driven state machine, the envelope is a short list of timed breakpoints,
computed once and then evaluated at any time offset.

Vocabulary
----------

  breakpoint  A (time, gain, ramp) triple. `time` is seconds from voice
              start, `gain` the value reached at that time, `ramp` how the
              value travels there from the previous breakpoint.

  peak        The gain reached at the end of the attack. For cue voices this
              is `base level × master volume`.

  floor       A small positive value (0.001, about -60 dB) the release aims
              at. An exponential ramp can never reach zero, and a ramp toward
              zero is undefined, so it stops just short.


The Shape
---------

  gain
  peak ┐      ╱╲
       │     ╱  ╲
  S·pk │    ╱    ╲_____________
       │   ╱                   ╲
       │  ╱                     ╲_
  0    └─╱────────────────────────‾‾──→ t
         0   A   A+D        dur-R   dur
           lin  lin   hold      exp

Five breakpoints, always in this order:

    (0,              0,             set)
    (A,              peak,          linear)
    (A + D,          peak × S,      linear)
    (dur - R,        peak × S,      set)          ← hold
    (dur,            floor,         exponential)


Ramps
-----

Between breakpoint k-1 (t0, v0) and k (t1, v1), with f = (t - t0)/(t1 - t0):

    set          v0                     (jumps to v1 at t1)
    linear       v0 + (v1 - v0) · f
    exponential  v0 · (v1 / v0) ^ f     (holds v0 if v0 is zero)

The exponential release is the one detail worth keeping: tones that fall off
geometrically sound like something struck, linear fades sound like a fader.


Degenerate Timings
------------------

Nothing stops a caller from asking for attack + decay longer than the voice.
Rather than letting segments overlap, `shape` clamps:

    attack   ≤ dur
    decay    ≤ dur - attack
    release  ≤ dur
    release start = max(dur - release, attack + decay)

so breakpoint times never go backwards and the release always ends exactly
at `dur`. A zero-length segment simply jumps.
*/

/// Target of the final exponential release.
pub const ENVELOPE_FLOOR: f32 = 0.001;

/// Attack/decay/sustain/release, durations in seconds, sustain as a fraction
/// of peak.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeParams {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl EnvelopeParams {
    pub const fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self::new(0.01, 0.1, 0.3, 0.2)
    }
}

/// How a breakpoint is approached from the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Set,
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub time: f32,
    pub gain: f32,
    pub ramp: Ramp,
}

impl Breakpoint {
    const fn new(time: f32, gain: f32, ramp: Ramp) -> Self {
        Self { time, gain, ramp }
    }
}

#[inline]
fn non_negative(x: f32) -> f32 {
    if x.is_finite() {
        x.max(0.0)
    } else {
        0.0
    }
}

/// Compute the five ADSR breakpoints for a voice of `duration` seconds.
pub fn shape(duration: f32, params: &EnvelopeParams, peak: f32) -> [Breakpoint; 5] {
    let duration = non_negative(duration);
    let peak = non_negative(peak);
    let sustain = if params.sustain.is_finite() {
        params.sustain.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let attack = non_negative(params.attack).min(duration);
    let decay = non_negative(params.decay).min(duration - attack);
    let release = non_negative(params.release).min(duration);
    let decay_end = attack + decay;
    let release_start = (duration - release).max(decay_end);

    [
        Breakpoint::new(0.0, 0.0, Ramp::Set),
        Breakpoint::new(attack, peak, Ramp::Linear),
        Breakpoint::new(decay_end, peak * sustain, Ramp::Linear),
        Breakpoint::new(release_start, peak * sustain, Ramp::Set),
        Breakpoint::new(duration, ENVELOPE_FLOOR, Ramp::Exponential),
    ]
}

/// Evaluable gain curve for one voice.
#[derive(Debug, Clone, PartialEq)]
pub struct GainEnvelope {
    points: [Breakpoint; 5],
    peak: f32,
}

impl GainEnvelope {
    pub fn new(duration: f32, params: &EnvelopeParams, peak: f32) -> Self {
        let points = shape(duration, params, peak);
        Self {
            peak: points[1].gain,
            points,
        }
    }

    pub fn breakpoints(&self) -> &[Breakpoint; 5] {
        &self.points
    }

    pub fn peak(&self) -> f32 {
        self.peak
    }

    pub fn duration(&self) -> f32 {
        self.points[4].time
    }

    /// Gain at `t` seconds after voice start.
    pub fn gain_at(&self, t: f32) -> f32 {
        if t.is_nan() {
            return 0.0;
        }

        let Some(next_index) = self.points.iter().position(|p| p.time > t) else {
            return self.points[4].gain;
        };
        if next_index == 0 {
            return self.points[0].gain;
        }

        let prev = self.points[next_index - 1];
        let next = self.points[next_index];
        let frac = (t - prev.time) / (next.time - prev.time);

        match next.ramp {
            Ramp::Set => prev.gain,
            Ramp::Linear => prev.gain + (next.gain - prev.gain) * frac,
            Ramp::Exponential => {
                if prev.gain <= 0.0 {
                    prev.gain
                } else {
                    prev.gain * (next.gain / prev.gain).powf(frac)
                }
            }
        }
    }

    /// Write gains for consecutive samples starting `start` seconds into the
    /// voice.
    pub fn render(&self, out: &mut [f32], start: f32, sample_rate: f32) {
        let dt = 1.0 / sample_rate;
        for (i, gain) in out.iter_mut().enumerate() {
            *gain = self.gain_at(start + i as f32 * dt);
        }
    }
}

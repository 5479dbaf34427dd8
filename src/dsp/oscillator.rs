use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Tone Oscillators
================

Every tonal cue starts from a phase accumulator: `phase` walks from 0 to 1
once per cycle, advancing by `frequency / sample_rate` each sample, and a
waveform function maps phase to amplitude.

    Sine       sin(2π·phase)                  fundamental only, the default
    Triangle   piecewise linear ±1            odd harmonics, falling as 1/n²
    Square     +1 then -1                     odd harmonics, falling as 1/n
    Sawtooth   2·phase - 1                    every harmonic, falling as 1/n

Square and sawtooth jump instantly, which aliases badly at high pitches (a
1320 Hz square has audible foldover at 48 kHz). Both get a PolyBLEP
correction: a two-sample polynomial that rounds the corner of each step.

Frequency is passed per sample rather than stored, so a voice can glide
without the oscillator knowing about it.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    /// Produce one sample at `frequency` and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let inc = (frequency / sample_rate).clamp(0.0, 0.5);
        let t = self.phase;

        let sample = match self.waveform {
            Waveform::Sine => (TAU * t).sin(),
            Waveform::Sawtooth => (2.0 * t - 1.0) - poly_blep(t, inc),
            Waveform::Square => {
                let naive = if t < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(t, inc) - poly_blep((t + 0.5) % 1.0, inc)
            }
            Waveform::Triangle => {
                if t < 0.5 {
                    4.0 * t - 1.0
                } else {
                    3.0 - 4.0 * t
                }
            }
        };

        self.phase += inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }

    /// Fill `out` at a constant frequency.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }
}

/// Correction for a unit step at phase 0, `dt` is the phase increment.
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        0.0
    } else if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48_000.0;

    fn zero_crossings(buffer: &[f32]) -> usize {
        buffer
            .windows(2)
            .filter(|w| w[0] < 0.0 && w[1] >= 0.0)
            .count()
    }

    #[test]
    fn sine_starts_at_zero() {
        let mut osc = Oscillator::new(Waveform::Sine);
        assert!(osc.next_sample(440.0, SR).abs() < 1e-6);
    }

    #[test]
    fn every_waveform_stays_bounded() {
        for waveform in [
            Waveform::Sine,
            Waveform::Square,
            Waveform::Sawtooth,
            Waveform::Triangle,
        ] {
            let mut osc = Oscillator::new(waveform);
            let mut buffer = vec![0.0; 4_800];
            osc.render(&mut buffer, 1_320.0, SR);
            assert!(
                buffer.iter().all(|s| s.abs() <= 1.5),
                "{waveform:?} escaped its range"
            );
        }
    }

    #[test]
    fn cycle_count_tracks_frequency() {
        let mut osc = Oscillator::new(Waveform::Sine);
        let mut buffer = vec![0.0; SR as usize];
        osc.render(&mut buffer, 100.0, SR);

        let crossings = zero_crossings(&buffer);
        assert!((99..=101).contains(&crossings), "crossings: {crossings}");
    }
}

use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type       | passes          | rejects         | used for                  |
| ---------- | --------------- | --------------- | ------------------------- |
| low-pass   | below cutoff    | above cutoff    | dull thuds, pours         |
| high-pass  | above cutoff    | below cutoff    | key clicks, hiss          |
| band-pass  | around cutoff   | either side     | metallic rings, sizzles   |

Trapezoidal state-variable filter (Simper/Zavalishin). One structure yields
all three responses; `q` sets the damping (`k = 1/q`), 0.707 is the flattest
response with no peak.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

/// What a voice asks for: response type, cutoff and Q.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub kind: FilterType,
    pub cutoff_hz: f32,
    pub q: f32,
}

impl FilterSpec {
    pub const DEFAULT_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            kind: FilterType::LowPass,
            cutoff_hz,
            q: Self::DEFAULT_Q,
        }
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self {
            kind: FilterType::HighPass,
            cutoff_hz,
            q: Self::DEFAULT_Q,
        }
    }

    pub fn bandpass(cutoff_hz: f32, q: f32) -> Self {
        Self {
            kind: FilterType::BandPass,
            cutoff_hz,
            q,
        }
    }
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    g: f32,
    k: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(spec: &FilterSpec, sample_rate: f32) -> Self {
        // Keep the cutoff below Nyquist so tan() stays finite
        let cutoff = spec.cutoff_hz.clamp(10.0, sample_rate * 0.49);
        let g = (TAU * cutoff / (2.0 * sample_rate)).tan();
        let q = if spec.q.is_finite() { spec.q.max(0.05) } else { FilterSpec::DEFAULT_Q };

        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g,
            k: 1.0 / q,
            filter_type: spec.kind,
        }
    }

    #[inline]
    pub fn tick(&mut self, sample: f32) -> FilterOutputs {
        let (g, k) = (self.g, self.k);
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> f32 {
        let outputs = self.tick(sample);
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            FilterType::BandPass => outputs.bandpass,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::{Oscillator, Waveform};

    const SR: f32 = 48_000.0;

    fn sine(frequency: f32, len: usize) -> Vec<f32> {
        let mut osc = Oscillator::new(Waveform::Sine);
        let mut buffer = vec![0.0; len];
        osc.render(&mut buffer, frequency, SR);
        buffer
    }

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(256);
        buffer
            .get(skip..)
            .unwrap_or(buffer)
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut filter = SVFilter::new(&FilterSpec::lowpass(500.0), SR);
        let mut buffer = vec![1.0; 512];
        filter.render(&mut buffer);
        assert!(buffer[511] > 0.99);
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut filter = SVFilter::new(&FilterSpec::highpass(500.0), SR);
        let mut buffer = vec![1.0; 512];
        filter.render(&mut buffer);
        assert!(buffer[511].abs() < 0.001);
    }

    #[test]
    fn lowpass_attenuates_high_frequencies() {
        let mut filter = SVFilter::new(&FilterSpec::lowpass(500.0), SR);
        let mut buffer = sine(5_000.0, 2_048);
        filter.render(&mut buffer);

        let peak = peak_after_transient(&buffer);
        assert!(peak < 0.1, "expected attenuation, got peak {peak}");
    }

    #[test]
    fn bandpass_emphasises_the_centre() {
        let spec = FilterSpec::bandpass(1_000.0, 2.0);

        let mut centre = sine(1_000.0, 4_096);
        SVFilter::new(&spec, SR).render(&mut centre);

        let mut off = sine(150.0, 4_096);
        SVFilter::new(&spec, SR).render(&mut off);

        let (centre_peak, off_peak) = (peak_after_transient(&centre), peak_after_transient(&off));
        assert!(
            centre_peak > off_peak * 2.0,
            "centre={centre_peak} off={off_peak}"
        );
    }

    #[test]
    fn cutoff_above_nyquist_stays_stable() {
        let mut filter = SVFilter::new(&FilterSpec::highpass(90_000.0), SR);
        let mut buffer = sine(440.0, 1_024);
        filter.render(&mut buffer);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}

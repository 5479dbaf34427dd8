//! Convolution Reverb - Uniformly Partitioned Overlap-Add
//!
//! Direct convolution with a 1.5 second impulse costs ~72k multiply-adds per
//! output sample at 48kHz. Doing the work in the frequency domain, one block
//! at a time, brings that down to a few hundred.
//!
//! # Partitioning
//!
//! The impulse is cut into `P` partitions of `B` samples. Each partition is
//! zero-padded to `2B` and transformed once, up front:
//!
//! ```text
//! impulse:  [ h0 | h1 | h2 | ... | hP-1 ]       each B samples
//! spectra:  H0, H1, H2, ..., HP-1               each 2B bins
//! ```
//!
//! Every time `B` input samples have been collected, the block is zero-padded
//! and transformed into `X`, pushed onto a frequency-domain delay line, and
//! the output spectrum is accumulated:
//!
//! ```text
//! Y = X[n]·H0 + X[n-1]·H1 + ... + X[n-P+1]·HP-1
//! ```
//!
//! The first half of `IFFT(Y)` plus the tail carried over from the previous
//! block is the next `B` output samples; the second half becomes the new
//! tail. Output lags input by one block.
//!
//! # Normalisation
//!
//! A long noise impulse has enormous total gain. Like platform convolver
//! nodes, the impulse is scaled by the inverse of its RMS power (with a
//! calibration constant) so a wet send comes out at a comparable loudness
//! whatever the impulse length.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::dsp::impulse::StereoBuffer;

/// Partition size in samples.
pub const PARTITION_SIZE: usize = 512;

const GAIN_CALIBRATION: f32 = 0.00125;
const GAIN_CALIBRATION_SAMPLE_RATE: f32 = 44_100.0;
const MIN_POWER: f32 = 0.000125;

/// Scale applied to an impulse so its RMS power maps to unity-ish loudness.
pub fn normalization_scale(impulse: &StereoBuffer) -> f32 {
    if impulse.is_empty() {
        return 1.0;
    }

    let sum_squares: f32 = impulse
        .left
        .iter()
        .chain(impulse.right.iter())
        .map(|s| s * s)
        .sum();
    let power = (sum_squares / (2 * impulse.len()) as f32).sqrt();
    let power = if power.is_finite() {
        power.max(MIN_POWER)
    } else {
        MIN_POWER
    };

    let mut scale = GAIN_CALIBRATION / power;
    if impulse.sample_rate() > 0.0 {
        scale *= GAIN_CALIBRATION_SAMPLE_RATE / impulse.sample_rate();
    }
    scale
}

/// Mono partitioned convolver for one impulse channel.
pub struct PartitionedConvolver {
    block: usize,
    fft: Arc<dyn Fft<f32>>,
    ifft: Arc<dyn Fft<f32>>,
    partitions: Vec<Vec<Complex<f32>>>,
    history: Vec<Vec<Complex<f32>>>,
    history_pos: usize,
    input: Vec<f32>,
    output: Vec<f32>,
    overlap: Vec<f32>,
    fill: usize,
    spectrum: Vec<Complex<f32>>,
    accum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl PartitionedConvolver {
    /// Build a convolver for `impulse`, scaled by `gain`.
    pub fn new(impulse: &[f32], gain: f32, planner: &mut FftPlanner<f32>) -> Self {
        let block = PARTITION_SIZE;
        let fft_len = block * 2;
        let fft = planner.plan_fft_forward(fft_len);
        let ifft = planner.plan_fft_inverse(fft_len);
        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(ifft.get_inplace_scratch_len());
        let mut scratch = vec![Complex::new(0.0, 0.0); scratch_len];

        let partitions: Vec<Vec<Complex<f32>>> = impulse
            .chunks(block)
            .map(|chunk| {
                let mut bins = vec![Complex::new(0.0, 0.0); fft_len];
                for (bin, &s) in bins.iter_mut().zip(chunk) {
                    bin.re = s * gain;
                }
                fft.process_with_scratch(&mut bins, &mut scratch);
                bins
            })
            .collect();

        let history = vec![vec![Complex::new(0.0, 0.0); fft_len]; partitions.len().max(1)];

        Self {
            block,
            fft,
            ifft,
            partitions,
            history,
            history_pos: 0,
            input: vec![0.0; block],
            output: vec![0.0; block],
            overlap: vec![0.0; block],
            fill: 0,
            spectrum: vec![Complex::new(0.0, 0.0); fft_len],
            accum: vec![Complex::new(0.0, 0.0); fft_len],
            scratch,
        }
    }

    /// Number of impulse partitions.
    pub fn partitions(&self) -> usize {
        self.partitions.len()
    }

    /// Samples of delay between input and output.
    pub fn latency(&self) -> usize {
        self.block
    }

    /// Convolve `buffer` in place.
    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            self.input[self.fill] = *sample;
            *sample = self.output[self.fill];
            self.fill += 1;

            if self.fill == self.block {
                self.process_partition();
                self.fill = 0;
            }
        }
    }

    fn process_partition(&mut self) {
        let fft_len = self.block * 2;

        for (bin, &s) in self.spectrum.iter_mut().zip(self.input.iter()) {
            *bin = Complex::new(s, 0.0);
        }
        for bin in &mut self.spectrum[self.block..] {
            *bin = Complex::new(0.0, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);

        // Newest input spectrum goes into the delay line
        self.history_pos = (self.history_pos + self.history.len() - 1) % self.history.len();
        self.history[self.history_pos].copy_from_slice(&self.spectrum);

        self.accum.fill(Complex::new(0.0, 0.0));
        for (p, partition) in self.partitions.iter().enumerate() {
            let delayed = &self.history[(self.history_pos + p) % self.history.len()];
            for ((acc, &x), &h) in self.accum.iter_mut().zip(delayed).zip(partition) {
                *acc += x * h;
            }
        }

        self.ifft
            .process_with_scratch(&mut self.accum, &mut self.scratch);

        let norm = 1.0 / fft_len as f32;
        for i in 0..self.block {
            self.output[i] = self.accum[i].re * norm + self.overlap[i];
            self.overlap[i] = self.accum[i + self.block].re * norm;
        }
    }
}

/// Stereo convolver: left input against the left impulse, right against right.
pub struct Convolver {
    left: PartitionedConvolver,
    right: PartitionedConvolver,
}

impl Convolver {
    /// Build a normalised convolver for `impulse`.
    pub fn new(impulse: &StereoBuffer) -> Self {
        Self::with_gain(impulse, normalization_scale(impulse))
    }

    /// Build a convolver with an explicit impulse gain (no normalisation).
    pub fn with_gain(impulse: &StereoBuffer, gain: f32) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            left: PartitionedConvolver::new(&impulse.left, gain, &mut planner),
            right: PartitionedConvolver::new(&impulse.right, gain, &mut planner),
        }
    }

    pub fn latency(&self) -> usize {
        self.left.latency()
    }

    /// Process a block of stereo audio in place.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.left.process(left);
        self.right.process(right);
    }
}

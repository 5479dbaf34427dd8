use crate::dsp::{filter::SVFilter, oscillator::Oscillator, pan::equal_power};

use super::{Source, Voice};

/// Audio-thread state for one [`Voice`].
///
/// Positions are absolute frames on the output clock, so a player can be
/// created before its start time and will stay silent until then.
pub struct VoicePlayer {
    voice: Voice,
    oscillator: Option<Oscillator>,
    filter: Option<SVFilter>,
    pan_gains: (f32, f32),
    weights: (f32, f32),
    start_frame: u64,
    end_frame: u64,
    sample_rate: f32,
}

/// Destination buffers for one block. All four must be the same length.
pub struct VoiceOutputs<'a> {
    pub dry_left: &'a mut [f32],
    pub dry_right: &'a mut [f32],
    pub wet_left: &'a mut [f32],
    pub wet_right: &'a mut [f32],
}

impl VoicePlayer {
    pub fn new(voice: Voice, sample_rate: f32) -> Self {
        let oscillator = match voice.source() {
            Source::Tone { waveform, .. } => Some(Oscillator::new(*waveform)),
            Source::Noise(_) => None,
        };
        let filter = voice.filter().map(|spec| SVFilter::new(spec, sample_rate));
        let start_frame = seconds_to_frames(voice.start(), sample_rate);
        let end_frame = seconds_to_frames(voice.stop(), sample_rate);

        Self {
            pan_gains: equal_power(voice.pan()),
            weights: voice.routing().weights(),
            oscillator,
            filter,
            start_frame,
            end_frame,
            sample_rate,
            voice,
        }
    }

    /// Give the voice back once the player is done with it.
    pub fn into_voice(self) -> Voice {
        self.voice
    }

    /// True once every frame before `frame` has been past the stop time.
    pub fn is_finished(&self, frame: u64) -> bool {
        frame >= self.end_frame
    }

    #[inline]
    fn frequency_at(frequency: f32, glide_to: Option<f32>, t: f32, duration: f32) -> f32 {
        match glide_to {
            Some(target) if frequency > 0.0 && target > 0.0 && duration > 0.0 => {
                frequency * (target / frequency).powf((t / duration).min(1.0))
            }
            _ => frequency,
        }
    }

    /// Mix this voice into `out` for the block starting at `block_start`.
    pub fn render(&mut self, block_start: u64, out: &mut VoiceOutputs<'_>) {
        let frames = out.dry_left.len();
        let block_end = block_start + frames as u64;
        if block_end <= self.start_frame || block_start >= self.end_frame {
            return;
        }

        let first = self.start_frame.saturating_sub(block_start) as usize;
        let last = (self.end_frame.min(block_end) - block_start) as usize;
        let (pan_l, pan_r) = self.pan_gains;
        let (dry, wet) = self.weights;
        let duration = self.voice.duration();
        let envelope = self.voice.envelope();

        for i in first..last {
            let elapsed = block_start + i as u64 - self.start_frame;
            let t = elapsed as f32 / self.sample_rate;

            let raw = match (self.voice.source(), self.oscillator.as_mut()) {
                (
                    Source::Tone {
                        frequency,
                        glide_to,
                        ..
                    },
                    Some(osc),
                ) => {
                    let f = Self::frequency_at(*frequency, *glide_to, t, duration);
                    osc.next_sample(f, self.sample_rate)
                }
                (Source::Noise(buffer), _) => buffer.get(elapsed as usize).copied().unwrap_or(0.0),
                _ => 0.0,
            };
            let filtered = match self.filter.as_mut() {
                Some(filter) => filter.next_sample(raw),
                None => raw,
            };

            let s = filtered * envelope.gain_at(t);
            let (l, r) = (s * pan_l, s * pan_r);

            out.dry_left[i] += l * dry;
            out.dry_right[i] += r * dry;
            if wet > 0.0 {
                out.wet_left[i] += l * wet;
                out.wet_right[i] += r * wet;
            }
        }
    }
}

#[inline]
fn seconds_to_frames(seconds: f64, sample_rate: f32) -> u64 {
    let frames = seconds * sample_rate as f64;
    if frames.is_finite() && frames > 0.0 {
        frames.round() as u64
    } else {
        0
    }
}

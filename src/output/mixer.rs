use crate::{
    dsp::{
        compressor::Compressor,
        convolver::Convolver,
        impulse::StereoBuffer,
    },
    output::BusSettings,
    voice::{
        render::{VoiceOutputs, VoicePlayer},
        Voice,
    },
    MAX_BLOCK_SIZE,
};

/// Live voices the mixer will hold at once. The player list is allocated
/// once at this size and never grows.
pub const MAX_VOICES: usize = 256;

/*
Per block:

  voice ─┐                         ┌──────────┐
  voice ─┼─ dry ───────────────────┤          │
  voice ─┤                         │ + ─ gain ─ compressor ─→ out
         └─ wet ─→ convolver ──────┤          │
                   (one, shared)   └──────────┘

Every voice adds into the same two stereo buses; the reverb runs once per
block over the summed wet bus, never per voice. Voices whose stop time falls
inside the block move to the retired list after it, where the owner of the
mixer collects them with `take_retired`. Nothing is freed while rendering.
*/

/// Sums voices into the master bus through the shared reverb unit.
pub struct Mixer {
    sample_rate: f32,
    players: Vec<VoicePlayer>,
    retired: Vec<Voice>,
    reverb: Option<Box<Convolver>>,
    compressor: Compressor,
    gain: f32,
    frame: u64,
    voices_started: usize,
    dry_left: Vec<f32>,
    dry_right: Vec<f32>,
    wet_left: Vec<f32>,
    wet_right: Vec<f32>,
}

impl Mixer {
    pub fn new(sample_rate: f32, bus: &BusSettings) -> Self {
        Self {
            sample_rate,
            players: Vec::with_capacity(MAX_VOICES),
            retired: Vec::with_capacity(MAX_VOICES),
            reverb: None,
            compressor: Compressor::new(bus.compressor, sample_rate),
            gain: bus.gain,
            frame: 0,
            voices_started: 0,
            dry_left: vec![0.0; MAX_BLOCK_SIZE],
            dry_right: vec![0.0; MAX_BLOCK_SIZE],
            wet_left: vec![0.0; MAX_BLOCK_SIZE],
            wet_right: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frames rendered so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Seconds rendered so far.
    pub fn time(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }

    /// Hands the voice back when `MAX_VOICES` are already playing.
    pub fn add_voice(&mut self, voice: Voice) -> Result<(), Voice> {
        if self.players.len() >= MAX_VOICES {
            return Err(voice);
        }
        self.players.push(VoicePlayer::new(voice, self.sample_rate));
        self.voices_started += 1;
        Ok(())
    }

    /// Install an already built convolver, returning the previous one so the
    /// caller decides where it is dropped.
    pub fn set_reverb(&mut self, convolver: Box<Convolver>) -> Option<Box<Convolver>> {
        self.reverb.replace(convolver)
    }

    pub fn install_reverb(&mut self, impulse: &StereoBuffer) {
        self.reverb = Some(Box::new(Convolver::new(impulse)));
    }

    /// Voices that finished since the last call.
    pub fn take_retired(&mut self) -> std::vec::Drain<'_, Voice> {
        self.retired.drain(..)
    }

    /// Voices still playing or waiting for their start time.
    pub fn active_voices(&self) -> usize {
        self.players.len()
    }

    pub fn voices_started(&self) -> usize {
        self.voices_started
    }

    /// Render `left.len()` frames. `left` and `right` must be the same length.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(left.len(), right.len());
        for (l, r) in left
            .chunks_mut(MAX_BLOCK_SIZE)
            .zip(right.chunks_mut(MAX_BLOCK_SIZE))
        {
            self.render_block(l, r);
        }
    }

    fn render_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        let block_start = self.frame;
        let block_end = block_start + frames as u64;

        let dry_left = &mut self.dry_left[..frames];
        let dry_right = &mut self.dry_right[..frames];
        let wet_left = &mut self.wet_left[..frames];
        let wet_right = &mut self.wet_right[..frames];
        dry_left.fill(0.0);
        dry_right.fill(0.0);
        wet_left.fill(0.0);
        wet_right.fill(0.0);

        let mut outputs = VoiceOutputs {
            dry_left,
            dry_right,
            wet_left,
            wet_right,
        };
        for player in self.players.iter_mut() {
            player.render(block_start, &mut outputs);
        }
        let mut i = 0;
        while i < self.players.len() {
            if self.players[i].is_finished(block_end) {
                let player = self.players.swap_remove(i);
                self.retired.push(player.into_voice());
            } else {
                i += 1;
            }
        }

        if let Some(reverb) = self.reverb.as_mut() {
            reverb.process_block(outputs.wet_left, outputs.wet_right);
            for (d, w) in outputs.dry_left.iter_mut().zip(outputs.wet_left.iter()) {
                *d += w;
            }
            for (d, w) in outputs.dry_right.iter_mut().zip(outputs.wet_right.iter()) {
                *d += w;
            }
        }

        for (out, &s) in left.iter_mut().zip(outputs.dry_left.iter()) {
            *out = s * self.gain;
        }
        for (out, &s) in right.iter_mut().zip(outputs.dry_right.iter()) {
            *out = s * self.gain;
        }
        self.compressor.process_block(&mut left[..frames], &mut right[..frames]);

        self.frame = block_end;
    }
}

//! Sound-card output through `cpal`.
//!
//! The mixer lives inside the stream callback. The engine side never touches
//! it directly: voices and the reverb unit are pushed through a wait-free
//! `rtrb` queue and picked up at the start of the next callback, and the
//! callback publishes how many frames it has rendered through an atomic so
//! the engine can read the output clock.
//!
//! Nothing is freed on the audio thread either. Finished voices, voices the
//! mixer had no room for and replaced reverb units travel back on a second
//! queue and are dropped the next time the engine talks to the context.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{debug, error, info, warn};

use crate::{
    dsp::{convolver::Convolver, impulse::StereoBuffer},
    output::{
        BusSettings, ContextState, Mixer, OutputBackend, OutputContext, OutputError, MAX_VOICES,
    },
    voice::Voice,
    MAX_BLOCK_SIZE,
};

const DEFAULT_COMMAND_CAPACITY: usize = 512;

enum MixerCommand {
    StartVoice(Voice),
    InstallReverb(Box<Convolver>),
}

/// Owned data the audio thread is done with.
enum Retired {
    Voice(Voice),
    Reverb(Box<Convolver>),
}

fn retire(queue: &mut Producer<Retired>, item: Retired) {
    // Queue full: the item is dropped here after all
    let _ = queue.push(item);
}

/// Opens the default output device of the default host.
pub struct DeviceBackend {
    command_capacity: usize,
    start_suspended: bool,
}

impl DeviceBackend {
    pub fn new() -> Self {
        Self {
            command_capacity: DEFAULT_COMMAND_CAPACITY,
            start_suspended: false,
        }
    }

    /// Build the stream but leave it paused until `resume()`.
    pub fn suspended(mut self) -> Self {
        self.start_suspended = true;
        self
    }

    pub fn command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity.max(1);
        self
    }
}

impl Default for DeviceBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputBackend for DeviceBackend {
    fn open(&mut self, bus: &BusSettings) -> Result<Box<dyn OutputContext>, OutputError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(OutputError::NoDevice)?;
        let supported = device.default_output_config()?;

        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(OutputError::UnsupportedFormat(format!(
                "{:?}",
                supported.sample_format()
            )));
        }

        let sample_rate = supported.sample_rate().0 as f32;
        let channels = supported.channels().max(1) as usize;
        let config: cpal::StreamConfig = supported.into();

        let (producer, mut consumer) = RingBuffer::<MixerCommand>::new(self.command_capacity);
        let (mut retired_tx, retired_rx) =
            RingBuffer::<Retired>::new(self.command_capacity + MAX_VOICES);
        let frames = Arc::new(AtomicU64::new(0));
        let frames_out = frames.clone();

        let mut mixer = Mixer::new(sample_rate, bus);
        let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut right = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                while let Ok(command) = consumer.pop() {
                    match command {
                        MixerCommand::StartVoice(voice) => {
                            if let Err(voice) = mixer.add_voice(voice) {
                                retire(&mut retired_tx, Retired::Voice(voice));
                            }
                        }
                        MixerCommand::InstallReverb(convolver) => {
                            if let Some(old) = mixer.set_reverb(convolver) {
                                retire(&mut retired_tx, Retired::Reverb(old));
                            }
                        }
                    }
                }

                for chunk in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
                    let n = chunk.len() / channels;
                    let (l, r) = (&mut left[..n], &mut right[..n]);
                    mixer.render(l, r);

                    for (i, frame) in chunk.chunks_mut(channels).enumerate() {
                        match frame {
                            [mono] => *mono = 0.5 * (l[i] + r[i]),
                            [fl, fr, rest @ ..] => {
                                *fl = l[i];
                                *fr = r[i];
                                rest.fill(0.0);
                            }
                            [] => {}
                        }
                    }
                }

                for voice in mixer.take_retired() {
                    retire(&mut retired_tx, Retired::Voice(voice));
                }
                frames_out.store(mixer.frame(), Ordering::Release);
            },
            |err| error!(%err, "output stream error"),
            None,
        )?;

        let state = if self.start_suspended {
            ContextState::Suspended
        } else {
            stream.play()?;
            ContextState::Running
        };

        info!(sample_rate, channels, ?state, "output device opened");

        Ok(Box::new(DeviceContext {
            stream,
            producer,
            retired: retired_rx,
            frames,
            sample_rate,
            state,
            voices_started: 0,
        }))
    }
}

struct DeviceContext {
    stream: cpal::Stream,
    producer: Producer<MixerCommand>,
    retired: Consumer<Retired>,
    frames: Arc<AtomicU64>,
    sample_rate: f32,
    state: ContextState,
    voices_started: usize,
}

impl DeviceContext {
    /// Drop whatever the audio thread has handed back.
    fn collect_retired(&mut self) {
        let mut voices = 0usize;
        while let Ok(item) = self.retired.pop() {
            match item {
                Retired::Voice(voice) => {
                    drop(voice);
                    voices += 1;
                }
                Retired::Reverb(reverb) => {
                    drop(reverb);
                    debug!("previous reverb unit released");
                }
            }
        }
        if voices > 0 {
            debug!(voices, "released finished voices");
        }
    }
}

impl OutputContext for DeviceContext {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn current_time(&self) -> f64 {
        self.frames.load(Ordering::Acquire) as f64 / self.sample_rate as f64
    }

    fn state(&self) -> ContextState {
        self.state
    }

    fn resume(&mut self) -> Result<(), OutputError> {
        match self.state {
            ContextState::Running => Ok(()),
            ContextState::Closed => Err(OutputError::Closed),
            ContextState::Suspended => {
                self.stream.play()?;
                self.state = ContextState::Running;
                Ok(())
            }
        }
    }

    fn install_reverb(&mut self, impulse: StereoBuffer) {
        self.collect_retired();
        // FFT planning happens here, off the audio thread
        let convolver = Box::new(Convolver::new(&impulse));
        if self
            .producer
            .push(MixerCommand::InstallReverb(convolver))
            .is_err()
        {
            warn!("output command queue full, reverb not installed");
        }
    }

    fn start_voice(&mut self, voice: Voice) {
        self.collect_retired();
        match self.producer.push(MixerCommand::StartVoice(voice)) {
            Ok(()) => self.voices_started += 1,
            Err(_) => warn!("output command queue full, dropping voice"),
        }
    }

    fn voices_started(&self) -> usize {
        self.voices_started
    }
}

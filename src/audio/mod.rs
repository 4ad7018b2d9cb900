//! Audio engine: cpal output stream, lock-free command queue, voice mixer and
//! master limiter.
//!
//! The engine owns the cpal stream and a sample bank. Starting a note looks
//! the sample up, wraps it in a [`Voice`] and sends it to the audio thread
//! through the ring buffer; the caller keeps a [`VoiceHandle`] sharing the
//! voice's atomic state.

pub mod callback;
pub mod command;
pub mod limiter;
pub mod silent;
pub mod voice;

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::{
    traits::{Producer, Split},
    HeapRb,
};
use thiserror::Error;

use crate::playback::{AudioOutput, OutputError};
use crate::samples::SampleBank;
use crate::theory::SampleKey;

pub use command::AudioCommand;
pub use limiter::Limiter;
pub use silent::{SilentInstance, SilentOutput};
pub use voice::{Voice, VoiceHandle, VoiceState};

use callback::AudioCallback;

/// Ring buffer capacity (number of commands).
const RING_BUFFER_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoOutputDevice,
    #[error("device config error: {0}")]
    DeviceConfig(String),
    #[error("stream build error: {0}")]
    StreamBuild(String),
    #[error("stream play error: {0}")]
    StreamPlay(String),
    /// The audio thread is not draining commands.
    #[error("audio command ring buffer is full")]
    BufferFull,
}

/// Parameters of the default output device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl DeviceFormat {
    /// Query the default output device.
    pub fn probe() -> Result<Self, AudioError> {
        let device = default_device()?;
        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;
        Ok(Self {
            sample_rate: config.sample_rate().0,
            channels: config.channels(),
        })
    }
}

fn default_device() -> Result<cpal::Device, AudioError> {
    cpal::default_host()
        .default_output_device()
        .ok_or(AudioError::NoOutputDevice)
}

/// The audio engine. Owns the cpal stream, the command producer and the
/// sample bank.
pub struct AudioEngine {
    _stream: cpal::Stream,
    producer: ringbuf::HeapProd<AudioCommand>,
    bank: SampleBank,
    format: DeviceFormat,
}

impl AudioEngine {
    /// Open the default output device in `format`, playing from `bank`.
    ///
    /// The bank should already be at `format.sample_rate`.
    pub fn new(bank: SampleBank, format: DeviceFormat) -> Result<Self, AudioError> {
        let device = default_device()?;

        let (producer, consumer) = HeapRb::<AudioCommand>::new(RING_BUFFER_CAPACITY).split();
        let mut audio_callback = AudioCallback::new(consumer, format.channels);

        let stream_config = cpal::StreamConfig {
            channels: format.channels,
            sample_rate: cpal::SampleRate(format.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_fn = |err: cpal::StreamError| {
            eprintln!("audio stream error: {err}");
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    audio_callback.process(data);
                },
                err_fn,
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            producer,
            bank,
            format,
        })
    }

    pub fn format(&self) -> DeviceFormat {
        self.format
    }

    pub fn bank(&self) -> &SampleBank {
        &self.bank
    }

    /// Master gain on the audio thread.
    pub fn set_master_volume(&mut self, volume: f32) -> Result<(), AudioError> {
        self.send(AudioCommand::SetMasterVolume(volume))
    }

    /// Silence every voice at once.
    pub fn stop(&mut self) -> Result<(), AudioError> {
        self.send(AudioCommand::Stop)
    }

    fn send(&mut self, cmd: AudioCommand) -> Result<(), AudioError> {
        self.producer
            .try_push(cmd)
            .map_err(|_| AudioError::BufferFull)
    }
}

impl AudioOutput for AudioEngine {
    type Instance = VoiceHandle;

    fn play(&mut self, key: &SampleKey, volume: f32) -> Result<VoiceHandle, OutputError> {
        let frames = self
            .bank
            .get(key)
            .map(|data| data.shared())
            .ok_or_else(|| OutputError::UnknownSample(key.to_string()))?;

        let state = Arc::new(VoiceState::new(volume));
        self.send(AudioCommand::Start(Voice::new(frames, Arc::clone(&state))))
            .map_err(|e| OutputError::Unavailable(e.to_string()))?;
        Ok(VoiceHandle::new(state, self.format.sample_rate))
    }
}

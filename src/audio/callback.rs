//! Audio callback, run on the cpal thread.
//!
//! Drains commands from the ring buffer, mixes every live voice, applies the
//! master gain and the limiter. Paused voices are dropped here.

use ringbuf::traits::Consumer;
use ringbuf::HeapCons;

use super::command::AudioCommand;
use super::limiter::Limiter;
use super::voice::Voice;

/// Voices beyond this are refused so the callback never reallocates. A
/// refused voice is paused so its handle reports it stopped.
pub const MAX_VOICES: usize = 128;

pub struct AudioCallback {
    consumer: HeapCons<AudioCommand>,
    voices: Vec<Voice>,
    master_volume: f32,
    limiter: Limiter,
    channels: usize,
}

impl AudioCallback {
    pub fn new(consumer: HeapCons<AudioCommand>, channels: u16) -> Self {
        Self {
            consumer,
            voices: Vec::with_capacity(MAX_VOICES),
            master_volume: 1.0,
            limiter: Limiter::default(),
            channels: usize::from(channels.max(1)),
        }
    }

    /// Fill `output` with the next block.
    pub fn process(&mut self, output: &mut [f32]) {
        while let Some(cmd) = self.consumer.try_pop() {
            match cmd {
                AudioCommand::Start(voice) => {
                    if self.voices.len() < MAX_VOICES {
                        self.voices.push(voice);
                    } else {
                        voice.pause();
                    }
                }
                AudioCommand::SetMasterVolume(v) => self.master_volume = v.clamp(0.0, 1.0),
                AudioCommand::Stop => self.voices.clear(),
            }
        }

        output.fill(0.0);
        self.voices.retain(|v| !v.is_paused());
        for voice in &mut self.voices {
            voice.mix_into(output, self.channels);
        }

        if self.master_volume < 1.0 {
            for s in output.iter_mut() {
                *s *= self.master_volume;
            }
        }
        self.limiter.process_block(output);
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }
}

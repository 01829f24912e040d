//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::frame::Frame;
use crate::traits::{AudioError, AudioOutput};

/// Buffered frames, in milliseconds of audio.
const BUFFER_MS: usize = 100;

/// Default output device fed through a lock-free ring buffer.
///
/// Buzzer output is mono, so each frame's left sample is copied to every
/// device channel; the device keeps its native channel count.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    producer: HeapProd<Frame>,
    running: Arc<AtomicBool>,
}

impl CpalOutput {
    /// Open the default output device. Returns the output and the consumer
    /// half of its ring buffer, which [`CpalOutput::build_stream`] takes.
    pub fn new() -> Result<(Self, HeapCons<Frame>), AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let config: StreamConfig = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?
            .into();

        if let Ok(name) = device.name() {
            log::info!(
                "audio device: {} ({} Hz, {} ch)",
                name,
                config.sample_rate.0,
                config.channels
            );
        }

        let capacity = config.sample_rate.0 as usize * BUFFER_MS / 1000;
        let (producer, consumer) = HeapRb::<Frame>::new(capacity.max(1)).split();

        let output = Self {
            device,
            config,
            stream: None,
            producer,
            running: Arc::new(AtomicBool::new(false)),
        };
        Ok((output, consumer))
    }

    /// Build the device stream around the ring buffer consumer and start it.
    pub fn build_stream(&mut self, mut consumer: HeapCons<Frame>) -> Result<(), AudioError> {
        let running = self.running.clone();
        let channels = self.config.channels.max(1) as usize;

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for chunk in data.chunks_mut(channels) {
                        let frame = if running.load(Ordering::Relaxed) {
                            consumer.try_pop().unwrap_or_default()
                        } else {
                            Frame::silence()
                        };
                        chunk.fill(frame.left as f32 / 32768.0);
                    }
                },
                |err| log::error!("audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        self.running.store(true, Ordering::Relaxed);
        self.stream = Some(stream);
        Ok(())
    }

    /// Queue one frame, spinning until the ring buffer has room.
    pub fn write_spin(&mut self, frame: Frame) {
        while self.producer.try_push(frame).is_err() {
            std::hint::spin_loop();
        }
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn write(&mut self, frames: &[Frame]) -> Result<(), AudioError> {
        self.producer.push_slice(frames);
        Ok(())
    }

    fn start(&mut self) -> Result<(), AudioError> {
        self.running.store(true, Ordering::Relaxed);
        if let Some(stream) = &self.stream {
            stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::Relaxed);
        if let Some(stream) = &self.stream {
            stream.pause().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }
}

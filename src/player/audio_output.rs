use crate::core::{AudioFormat, PlayerError, Result};
use crate::player::sample_buffer::SampleBuffer;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig, SupportedStreamConfigRange};
use log::{debug, info, warn};
use std::sync::Arc;

/// Audio output - plays buffered samples through cpal.
///
/// The device invokes the data callback on its own real-time thread at
/// whatever cadence it needs; the callback drains the shared buffer and
/// leaves silence when it runs dry.
pub struct AudioOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    buffer: Arc<SampleBuffer>,
}

impl AudioOutput {
    /// Open the default output device with the fixed target format.
    pub fn new(target: AudioFormat, buffer: Arc<SampleBuffer>) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| PlayerError::Audio("no audio output device found".to_string()))?;

        debug!("audio device: {}", device.name().unwrap_or_default());

        let config = StreamConfig {
            channels: target.channels,
            sample_rate: cpal::SampleRate(target.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let supported = device
            .supported_output_configs()
            .map_err(|e| PlayerError::Audio(format!("failed to query output configs: {}", e)))?;

        let usable = supported
            .into_iter()
            .any(|range| Self::is_config_compatible(&config, &range));
        if !usable {
            return Err(PlayerError::Audio(format!(
                "device does not support {} Hz / {} ch / s16 output",
                target.sample_rate, target.channels
            )));
        }

        Ok(Self {
            device,
            config,
            stream: None,
            buffer,
        })
    }

    fn is_config_compatible(config: &StreamConfig, supported: &SupportedStreamConfigRange) -> bool {
        config.sample_rate >= supported.min_sample_rate()
            && config.sample_rate <= supported.max_sample_rate()
            && config.channels == supported.channels()
            && supported.sample_format() == SampleFormat::I16
    }

    /// Build and start the output stream.
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let buffer = self.buffer.clone();
        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    buffer.mix_into(data);
                },
                move |err| {
                    warn!("audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| PlayerError::Audio(format!("failed to build audio stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| PlayerError::Audio(format!("failed to start audio stream: {}", e)))?;

        self.stream = Some(stream);
        info!(
            "audio output started: {} Hz, {} channels",
            self.config.sample_rate.0, self.config.channels
        );

        Ok(())
    }

    /// Stop playback by dropping the stream.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("audio output stopped");
        }
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stop();
    }
}

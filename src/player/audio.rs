use crate::core::{AudioFormat, Result};
use crate::player::sample_buffer::SampleBuffer;
use ffmpeg_next as ffmpeg;
use ffmpeg_next::util::channel_layout::ChannelLayout;
use ffmpeg_next::{codec, format::stream::Stream, software, util};
use log::debug;
use std::sync::Arc;

/// Audio decode pipeline: compressed packets in, interleaved i16
/// samples appended to the shared buffer.
///
/// The resampler is built once at init for the fixed target format and
/// converts whatever the source delivers into packed S16 at the target
/// rate and channel count.
pub struct AudioPipeline {
    decoder: codec::decoder::Audio,
    resampler: software::resampling::Context,
    buffer: Arc<SampleBuffer>,
    channels: u16,
}

impl AudioPipeline {
    /// Build the decoder and the persistent resampler from the selected
    /// audio stream.
    pub fn from_stream(
        stream: Stream,
        target: AudioFormat,
        buffer: Arc<SampleBuffer>,
    ) -> Result<Self> {
        let context = codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = context.decoder().audio()?;

        debug!(
            "audio decoder: {} Hz, {} channels, format {:?} -> target {} Hz, {} channels, s16",
            decoder.rate(),
            decoder.channels(),
            decoder.format(),
            target.sample_rate,
            target.channels
        );

        let in_layout = input_channel_layout(decoder.channel_layout(), decoder.channels());
        let out_layout = ChannelLayout::default(i32::from(target.channels));

        let resampler = software::resampling::Context::get(
            decoder.format(),
            in_layout,
            decoder.rate(),
            util::format::Sample::I16(util::format::sample::Type::Packed),
            out_layout,
            target.sample_rate,
        )?;

        Ok(Self {
            decoder,
            resampler,
            buffer,
            channels: target.channels,
        })
    }

    /// Decode one packet and append every resampled frame to the buffer.
    ///
    /// Send/receive failures mean no samples this call, same silent-skip
    /// policy as the video pipeline.
    pub fn process(&mut self, packet: &ffmpeg::Packet) {
        if let Err(e) = self.decoder.send_packet(packet) {
            debug!("audio send_packet failed (skipped): {}", e);
            return;
        }

        let mut decoded = util::frame::Audio::empty();
        loop {
            match self.decoder.receive_frame(&mut decoded) {
                Ok(()) => {
                    let mut resampled = util::frame::Audio::empty();
                    match self.resampler.run(&decoded, &mut resampled) {
                        Ok(_) => self.append_samples(&resampled),
                        Err(e) => debug!("resample failed (skipped): {}", e),
                    }
                }
                Err(ffmpeg::Error::Other { errno: 11 }) => break, // EAGAIN
                Err(ffmpeg::Error::Eof) => break,
                Err(e) => {
                    debug!("audio decode error (skipped): {}", e);
                    break;
                }
            }
        }
    }

    fn append_samples(&self, resampled: &util::frame::Audio) {
        let sample_count = resampled.samples() * usize::from(self.channels);
        if sample_count == 0 {
            return;
        }
        // Packed S16: plane 0 holds the interleaved samples.
        let data = resampled.data(0);
        let pcm =
            unsafe { std::slice::from_raw_parts(data.as_ptr() as *const i16, sample_count) };
        self.buffer.append(pcm);
    }
}

/// Input layout for the resampler. Sources that declare no layout get
/// the default for their channel count; zero declared channels fall
/// back to stereo.
fn input_channel_layout(layout: ChannelLayout, channels: u16) -> ChannelLayout {
    if !layout.is_empty() {
        return layout;
    }
    let channels = if channels == 0 { 2 } else { channels };
    ChannelLayout::default(i32::from(channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_channels_defaults_to_stereo() {
        let layout = input_channel_layout(ChannelLayout::empty(), 0);
        assert_eq!(layout, ChannelLayout::STEREO);
    }

    #[test]
    fn test_declared_layout_is_kept() {
        let layout = input_channel_layout(ChannelLayout::MONO, 1);
        assert_eq!(layout, ChannelLayout::MONO);
    }

    #[test]
    fn test_missing_layout_derived_from_channel_count() {
        let layout = input_channel_layout(ChannelLayout::empty(), 1);
        assert_eq!(layout, ChannelLayout::default(1));
    }
}

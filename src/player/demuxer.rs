use crate::core::{PlayerError, Result};
use crate::player::source::{PacketSource, ReadOutcome, TaggedPacket};
use ffmpeg_next as ffmpeg;
use ffmpeg_next::{format, media};
use log::{debug, info};

/// Demuxer - opens the RTSP stream and hands out tagged packets.
pub struct Demuxer {
    input_ctx: format::context::Input,
    video_stream_index: Option<usize>,
    audio_stream_index: Option<usize>,
}

impl Demuxer {
    /// Open an RTSP stream and probe its stream layout.
    pub fn open(url: &str) -> Result<Self> {
        info!("opening stream: {}", url);

        // Force TCP so packets survive lossy networks, keep the socket
        // timeout short and skip input-side buffering for latency.
        let mut options = ffmpeg::Dictionary::new();
        options.set("rtsp_transport", "tcp");
        options.set("stimeout", "5000000");
        options.set("fflags", "nobuffer");
        options.set("buffer_size", "102400");

        let input_ctx = format::input_with_dictionary(&url, options)
            .map_err(|e| PlayerError::Open(format!("{}: {}", url, e)))?;

        let mediums: Vec<media::Type> = input_ctx
            .streams()
            .map(|s| s.parameters().medium())
            .collect();
        let (video_stream_index, audio_stream_index) = select_streams(&mediums);

        debug!("video stream index: {:?}", video_stream_index);
        debug!("audio stream index: {:?}", audio_stream_index);

        Ok(Self {
            input_ctx,
            video_stream_index,
            audio_stream_index,
        })
    }

    /// The selected video stream, if the input has one.
    pub fn video_stream(&self) -> Option<format::stream::Stream> {
        self.video_stream_index
            .and_then(|idx| self.input_ctx.stream(idx))
    }

    /// The selected audio stream, if the input has one.
    pub fn audio_stream(&self) -> Option<format::stream::Stream> {
        self.audio_stream_index
            .and_then(|idx| self.input_ctx.stream(idx))
    }
}

impl PacketSource for Demuxer {
    fn read_packet(&mut self) -> ReadOutcome {
        let mut packet = ffmpeg::Packet::empty();
        match packet.read(&mut self.input_ctx) {
            Ok(()) => {
                let stream_index = packet.stream();
                ReadOutcome::Packet(TaggedPacket {
                    packet,
                    stream_index,
                })
            }
            Err(ffmpeg::Error::Eof) => ReadOutcome::EndOfStream,
            Err(e) => {
                debug!("read error (will retry): {}", e);
                ReadOutcome::TransientError
            }
        }
    }

    fn video_stream_index(&self) -> Option<usize> {
        self.video_stream_index
    }

    fn audio_stream_index(&self) -> Option<usize> {
        self.audio_stream_index
    }
}

/// Pick the first video and first audio stream in declaration order.
/// Later streams of the same type are ignored.
fn select_streams(mediums: &[media::Type]) -> (Option<usize>, Option<usize>) {
    let mut video = None;
    let mut audio = None;
    for (idx, medium) in mediums.iter().enumerate() {
        match *medium {
            media::Type::Video if video.is_none() => video = Some(idx),
            media::Type::Audio if audio.is_none() => audio = Some(idx),
            _ => {}
        }
    }
    (video, audio)
}

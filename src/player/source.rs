use ffmpeg_next as ffmpeg;

/// One demuxed packet tagged with the stream it came from.
///
/// Owned by the playback loop between read and dispatch and dropped
/// right after; nothing retains packets across iterations.
pub struct TaggedPacket {
    pub packet: ffmpeg::Packet,
    pub stream_index: usize,
}

/// Result of one read attempt against a packet source.
pub enum ReadOutcome {
    /// A packet was read.
    Packet(TaggedPacket),
    /// The source is exhausted. Terminal, not an error.
    EndOfStream,
    /// A momentary read failure; the caller retries after a short delay.
    TransientError,
}

/// Abstract packet source driving the playback loop.
///
/// The RTSP demuxer is the production implementation; tests drive the
/// loop with scripted sources instead.
pub trait PacketSource {
    /// Read the next packet. Blocks until the transport yields one.
    fn read_packet(&mut self) -> ReadOutcome;

    /// Index of the selected video stream, if any.
    fn video_stream_index(&self) -> Option<usize>;

    /// Index of the selected audio stream, if any.
    fn audio_stream_index(&self) -> Option<usize>;
}

// Player core modules

pub mod audio;
pub mod audio_output;
pub mod demuxer;
pub mod playback;
pub mod sample_buffer;
pub mod source;
pub mod video;

pub use audio::AudioPipeline;
pub use audio_output::AudioOutput;
pub use demuxer::Demuxer;
pub use playback::Player;
pub use sample_buffer::SampleBuffer;
pub use source::{PacketSource, ReadOutcome, TaggedPacket};
pub use video::VideoPipeline;

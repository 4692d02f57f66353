/// Fixed audio output format.
///
/// The decode pipeline resamples every source into this format and the
/// output device is opened with it; both are established once at setup
/// and never change mid-stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: 2,
        }
    }
}

/// Why the playback loop stopped. Both cases are normal termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source reported end-of-stream.
    EndOfStream,
    /// The running flag was cleared by SIGINT, window close or the quit key.
    Interrupted,
}

use thiserror::Error;

/// Errors that abort setup or playback.
///
/// Transient per-packet failures (decode send/receive errors, momentary
/// read failures, audio underruns) are absorbed inside the pipelines and
/// never surface as a `PlayerError`.
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("FFmpeg error: {0}")]
    Ffmpeg(#[from] ffmpeg_next::Error),

    #[error("failed to open stream: {0}")]
    Open(String),

    #[error("no audio or video streams found")]
    NoStreams,

    #[error("SDL error: {0}")]
    Sdl(String),

    #[error("audio output error: {0}")]
    Audio(String),

    #[error("setup error: {0}")]
    Setup(String),
}

pub type Result<T> = std::result::Result<T, PlayerError>;

// Video presentation layer

pub mod sdl;

pub use sdl::SdlPresenter;

use crate::core::Result;
use ffmpeg_next::util::frame;

/// Sink for decoded video frames plus the pending-event drain.
pub trait Presenter {
    /// Drain pending UI events; returns true if a quit was requested
    /// (window close or the `q` key).
    fn poll_quit(&mut self) -> bool;

    /// Display one YUV420P frame immediately.
    fn present(&mut self, frame: &frame::Video) -> Result<()>;
}

/// Presenter for audio-only streams: no window, no events. The playback
/// loop never routes frames here because no video pipeline exists.
pub struct HeadlessPresenter;

impl Presenter for HeadlessPresenter {
    fn poll_quit(&mut self) -> bool {
        false
    }

    fn present(&mut self, _frame: &frame::Video) -> Result<()> {
        Ok(())
    }
}

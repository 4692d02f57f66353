use crate::core::{Result, StopReason};
use crate::player::audio::AudioPipeline;
use crate::player::source::{PacketSource, ReadOutcome};
use crate::player::video::VideoPipeline;
use crate::renderer::Presenter;
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Flat delay before retrying after a transient read failure.
const READ_RETRY_DELAY: Duration = Duration::from_millis(5);

/// The playback loop: pulls packets from the source, routes them to the
/// matching pipeline and renders video frames as soon as they decode.
///
/// The running flag is injected by the caller; SIGINT and UI quit events
/// clear it, and the loop observes it at the top of each iteration. Once
/// cleared it stays cleared.
pub struct Player<S: PacketSource> {
    source: S,
    video: Option<VideoPipeline>,
    audio: Option<AudioPipeline>,
    running: Arc<AtomicBool>,
}

impl<S: PacketSource> Player<S> {
    pub fn new(
        source: S,
        video: Option<VideoPipeline>,
        audio: Option<AudioPipeline>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            video,
            audio,
            running,
        }
    }

    /// Drive the demux/decode/present cycle until end-of-stream or until
    /// the running flag is cleared.
    pub fn run(&mut self, presenter: &mut dyn Presenter) -> Result<StopReason> {
        let video_index = self.source.video_stream_index();
        let audio_index = self.source.audio_stream_index();

        while self.running.load(Ordering::Relaxed) {
            if presenter.poll_quit() {
                self.running.store(false, Ordering::Relaxed);
                break;
            }

            match self.source.read_packet() {
                ReadOutcome::EndOfStream => {
                    info!("end of stream");
                    return Ok(StopReason::EndOfStream);
                }
                ReadOutcome::TransientError => {
                    thread::sleep(READ_RETRY_DELAY);
                }
                ReadOutcome::Packet(tagged) => {
                    if Some(tagged.stream_index) == video_index {
                        if let Some(video) = self.video.as_mut() {
                            video.process(&tagged.packet, presenter);
                        }
                    } else if Some(tagged.stream_index) == audio_index {
                        if let Some(audio) = self.audio.as_mut() {
                            audio.process(&tagged.packet);
                        }
                    }
                    // Unmatched packets are discarded; the packet drops
                    // here either way.
                }
            }
        }

        Ok(StopReason::Interrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::source::TaggedPacket;
    use ffmpeg_next as ffmpeg;

    /// Scripted source; yields EndOfStream once the script runs out.
    struct MockSource {
        script: Vec<ReadOutcome>,
        reads: usize,
        video_index: Option<usize>,
        audio_index: Option<usize>,
        clear_flag_after: Option<(usize, Arc<AtomicBool>)>,
    }

    impl MockSource {
        fn new(script: Vec<ReadOutcome>) -> Self {
            Self {
                script,
                reads: 0,
                video_index: None,
                audio_index: None,
                clear_flag_after: None,
            }
        }
    }

    impl PacketSource for MockSource {
        fn read_packet(&mut self) -> ReadOutcome {
            self.reads += 1;
            if let Some((after, flag)) = &self.clear_flag_after {
                if self.reads >= *after {
                    flag.store(false, Ordering::Relaxed);
                }
            }
            if self.script.is_empty() {
                ReadOutcome::EndOfStream
            } else {
                self.script.remove(0)
            }
        }

        fn video_stream_index(&self) -> Option<usize> {
            self.video_index
        }

        fn audio_stream_index(&self) -> Option<usize> {
            self.audio_index
        }
    }

    struct MockPresenter {
        polls: usize,
        presents: usize,
        quit_on_poll: Option<usize>,
    }

    impl MockPresenter {
        fn new() -> Self {
            Self {
                polls: 0,
                presents: 0,
                quit_on_poll: None,
            }
        }
    }

    impl Presenter for MockPresenter {
        fn poll_quit(&mut self) -> bool {
            self.polls += 1;
            self.quit_on_poll == Some(self.polls)
        }

        fn present(&mut self, _frame: &ffmpeg::util::frame::Video) -> Result<()> {
            self.presents += 1;
            Ok(())
        }
    }

    fn packet(stream_index: usize) -> ReadOutcome {
        ReadOutcome::Packet(TaggedPacket {
            packet: ffmpeg::Packet::empty(),
            stream_index,
        })
    }

    #[test]
    fn test_end_of_stream_stops_without_interrupt() {
        let running = Arc::new(AtomicBool::new(true));
        let mut player = Player::new(MockSource::new(vec![]), None, None, running.clone());
        let mut presenter = MockPresenter::new();

        let reason = player.run(&mut presenter).unwrap();
        assert_eq!(reason, StopReason::EndOfStream);
        // The flag was never touched; termination came from the source.
        assert!(running.load(Ordering::Relaxed));
    }

    #[test]
    fn test_flag_flip_stops_within_one_iteration() {
        let running = Arc::new(AtomicBool::new(true));
        let mut source = MockSource::new(vec![packet(0), packet(0), packet(0), packet(0)]);
        source.clear_flag_after = Some((2, running.clone()));

        let mut player = Player::new(source, None, None, running);
        let mut presenter = MockPresenter::new();

        let reason = player.run(&mut presenter).unwrap();
        assert_eq!(reason, StopReason::Interrupted);
        // The flag cleared during read 2; the loop noticed at the top of
        // the next iteration and never read again.
        assert_eq!(player.source.reads, 2);
    }

    #[test]
    fn test_cleared_flag_never_enters_loop() {
        let running = Arc::new(AtomicBool::new(false));
        let mut player = Player::new(MockSource::new(vec![packet(0)]), None, None, running);
        let mut presenter = MockPresenter::new();

        let reason = player.run(&mut presenter).unwrap();
        assert_eq!(reason, StopReason::Interrupted);
        assert_eq!(player.source.reads, 0);
        assert_eq!(presenter.polls, 0);
    }

    #[test]
    fn test_quit_event_stops_loop() {
        let running = Arc::new(AtomicBool::new(true));
        let mut player = Player::new(MockSource::new(vec![packet(0), packet(0)]), None, None, running.clone());
        let mut presenter = MockPresenter::new();
        presenter.quit_on_poll = Some(1);

        let reason = player.run(&mut presenter).unwrap();
        assert_eq!(reason, StopReason::Interrupted);
        assert_eq!(player.source.reads, 0);
        // The quit event latches the running flag off.
        assert!(!running.load(Ordering::Relaxed));
    }

    #[test]
    fn test_audio_only_stream_never_presents() {
        let running = Arc::new(AtomicBool::new(true));
        let mut source = MockSource::new(vec![packet(0), packet(0), packet(1)]);
        source.audio_index = Some(0);
        // No video stream, no video pipeline: audio packets go to the
        // (absent) audio pipeline and are discarded, index-1 packets are
        // unmatched, and nothing is ever rendered.
        let mut player = Player::new(source, None, None, running);
        let mut presenter = MockPresenter::new();

        let reason = player.run(&mut presenter).unwrap();
        assert_eq!(reason, StopReason::EndOfStream);
        assert_eq!(presenter.presents, 0);
    }

    #[test]
    fn test_transient_error_is_retried() {
        let running = Arc::new(AtomicBool::new(true));
        let script = vec![ReadOutcome::TransientError, ReadOutcome::TransientError, packet(3)];
        let mut player = Player::new(MockSource::new(script), None, None, running);
        let mut presenter = MockPresenter::new();

        let reason = player.run(&mut presenter).unwrap();
        assert_eq!(reason, StopReason::EndOfStream);
        // Two retries, one packet, then end-of-stream.
        assert_eq!(player.source.reads, 4);
    }
}

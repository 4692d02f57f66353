use clap::Parser;
use log::{error, info};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod cli;
mod core;
mod player;
mod renderer;

use crate::core::{AudioFormat, PlayerError, Result, StopReason};
use crate::player::{AudioOutput, AudioPipeline, Demuxer, Player, SampleBuffer, VideoPipeline};
use crate::renderer::{HeadlessPresenter, Presenter, SdlPresenter};

/// Upper bound on buffered audio, in seconds of target-format samples.
const MAX_BUFFERED_SECONDS: usize = 10;

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // Help and version requests are not failures.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&args) {
        Ok(reason) => {
            info!("playback finished: {:?}", reason);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("rplay: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &cli::Args) -> Result<StopReason> {
    ffmpeg_next::init()?;
    ffmpeg_next::util::log::set_level(ffmpeg_next::util::log::Level::Warning);

    // One-way stop signal shared with the SIGINT handler and the loop.
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::Relaxed))
            .map_err(|e| PlayerError::Setup(format!("failed to install SIGINT handler: {}", e)))?;
    }

    let demuxer = Demuxer::open(&args.url())?;

    let video = match demuxer.video_stream() {
        Some(stream) => Some(VideoPipeline::from_stream(stream)?),
        None => None,
    };

    let format = AudioFormat::default();
    let buffer = Arc::new(SampleBuffer::new(
        format.sample_rate as usize * usize::from(format.channels) * MAX_BUFFERED_SECONDS,
    ));

    let audio = match demuxer.audio_stream() {
        Some(stream) => Some(AudioPipeline::from_stream(stream, format, buffer.clone())?),
        None => None,
    };

    if video.is_none() && audio.is_none() {
        return Err(PlayerError::NoStreams);
    }

    let mut sdl_presenter;
    let mut headless;
    let presenter: &mut dyn Presenter = match &video {
        Some(pipeline) => {
            sdl_presenter = SdlPresenter::new(pipeline.width(), pipeline.height())?;
            &mut sdl_presenter
        }
        None => {
            headless = HeadlessPresenter;
            &mut headless
        }
    };

    // The output stream must stay alive for the whole playback run; its
    // callback thread drains the shared buffer on the device's cadence.
    let _audio_output = match &audio {
        Some(_) => {
            let mut output = AudioOutput::new(format, buffer)?;
            output.start()?;
            Some(output)
        }
        None => None,
    };

    let mut player = Player::new(demuxer, video, audio, running);
    player.run(presenter)
}

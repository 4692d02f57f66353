use crate::core::Result;
use crate::renderer::Presenter;
use ffmpeg_next as ffmpeg;
use ffmpeg_next::{codec, format::stream::Stream, software, util};
use log::{debug, warn};

/// Video decode pipeline: compressed packets in, presented frames out.
///
/// The scaler converts from the decoder's native pixel format to planar
/// YUV420P at the dimensions fixed when the stream was opened, and the
/// destination frame is allocated once and reused for every conversion.
pub struct VideoPipeline {
    decoder: codec::decoder::Video,
    scaler: software::scaling::Context,
    yuv: util::frame::Video,
    width: u32,
    height: u32,
}

impl VideoPipeline {
    /// Build the decoder, the persistent scaler and the reusable
    /// destination frame from the selected video stream.
    pub fn from_stream(stream: Stream) -> Result<Self> {
        let mut context = codec::context::Context::from_parameters(stream.parameters())?;
        let mut threading = codec::threading::Config::count(2);
        threading.kind = codec::threading::Type::Frame;
        context.set_threading(threading);

        let decoder = context.decoder().video()?;
        let width = decoder.width();
        let height = decoder.height();

        debug!(
            "video decoder: {}x{}, source format {:?}",
            width,
            height,
            decoder.format()
        );

        let scaler = software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            util::format::Pixel::YUV420P,
            width,
            height,
            software::scaling::Flags::BILINEAR,
        )?;

        let yuv = util::frame::Video::new(util::format::Pixel::YUV420P, width, height);

        Ok(Self {
            decoder,
            scaler,
            yuv,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Decode one packet and present every frame it yields.
    ///
    /// Send/receive failures mean no frame this call; the caller simply
    /// moves on to the next packet.
    pub fn process(&mut self, packet: &ffmpeg::Packet, presenter: &mut dyn Presenter) {
        if let Err(e) = self.decoder.send_packet(packet) {
            debug!("video send_packet failed (skipped): {}", e);
            return;
        }

        let mut decoded = util::frame::Video::empty();
        loop {
            match self.decoder.receive_frame(&mut decoded) {
                Ok(()) => {
                    // The scaler is tied to the dimensions fixed at
                    // stream open; a mid-stream resolution change is
                    // not handled.
                    if decoded.width() != self.width || decoded.height() != self.height {
                        warn!(
                            "frame size changed to {}x{} (expected {}x{}), frame skipped",
                            decoded.width(),
                            decoded.height(),
                            self.width,
                            self.height
                        );
                        continue;
                    }
                    if let Err(e) = self.scaler.run(&decoded, &mut self.yuv) {
                        debug!("scale failed (skipped): {}", e);
                        continue;
                    }
                    if let Err(e) = presenter.present(&self.yuv) {
                        warn!("present failed: {}", e);
                    }
                }
                Err(ffmpeg::Error::Other { errno: 11 }) => break, // EAGAIN
                Err(ffmpeg::Error::Eof) => break,
                Err(e) => {
                    debug!("video decode error (skipped): {}", e);
                    break;
                }
            }
        }
    }
}

use crate::core::{PlayerError, Result};
use crate::renderer::Presenter;
use ffmpeg_next::util::frame;
use log::info;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, Texture};
use sdl2::video::Window;
use sdl2::EventPump;

/// SDL2 presenter: centered resizable window, accelerated vsync
/// renderer and a streaming IYUV texture at the stream's dimensions.
pub struct SdlPresenter {
    canvas: Canvas<Window>,
    texture: Texture,
    event_pump: EventPump,
}

impl SdlPresenter {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let sdl = sdl2::init().map_err(PlayerError::Sdl)?;
        let video = sdl.video().map_err(PlayerError::Sdl)?;

        let window = video
            .window("rplay", width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| PlayerError::Sdl(e.to_string()))?;

        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(|e| PlayerError::Sdl(e.to_string()))?;

        let texture = canvas
            .texture_creator()
            .create_texture_streaming(PixelFormatEnum::IYUV, width, height)
            .map_err(|e| PlayerError::Sdl(e.to_string()))?;

        let event_pump = sdl.event_pump().map_err(PlayerError::Sdl)?;

        info!("created {}x{} window", width, height);

        Ok(Self {
            canvas,
            texture,
            event_pump,
        })
    }
}

impl Presenter for SdlPresenter {
    fn poll_quit(&mut self) -> bool {
        let mut quit = false;
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => quit = true,
                Event::KeyDown {
                    keycode: Some(Keycode::Q),
                    ..
                } => quit = true,
                _ => {}
            }
        }
        quit
    }

    fn present(&mut self, frame: &frame::Video) -> Result<()> {
        self.texture
            .update_yuv(
                None,
                frame.data(0),
                frame.stride(0),
                frame.data(1),
                frame.stride(1),
                frame.data(2),
                frame.stride(2),
            )
            .map_err(|e| PlayerError::Sdl(e.to_string()))?;

        // Scale to whatever size the window currently has.
        let (width, height) = self.canvas.output_size().map_err(PlayerError::Sdl)?;
        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Rect::new(0, 0, width, height))
            .map_err(PlayerError::Sdl)?;
        self.canvas.present();

        Ok(())
    }
}

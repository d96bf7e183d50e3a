//! SDL2 window surface

use std::panic::{self, AssertUnwindSafe};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{debug, info};

use super::{InputEvent, Key, Surface};
use crate::error::StartupError;
use crate::framebuffer::FrameBuffer;
use crate::ui::TouchPoint;

/// Window of a fixed size. Frames are drawn into a [`FrameBuffer`] and only
/// the changed region is copied to the window's display on present.
pub struct SdlSurface {
    framebuffer: FrameBuffer,
    display: SimulatorDisplay<Rgb565>,
    window: Window,
}

impl SdlSurface {
    /// Open the window. Fails if SDL cannot create it.
    pub fn new(title: &str, size: Size, scale: u32) -> Result<Self, StartupError> {
        info!(
            "Opening {}x{} window (scale {}x)",
            size.width, size.height, scale
        );
        let display = SimulatorDisplay::<Rgb565>::new(size);
        let output_settings = OutputSettingsBuilder::new().scale(scale).build();
        let mut window = Window::new(title, &output_settings);

        // The SDL window is created lazily on the first update, and events()
        // panics before that. SDL reports creation failures by panicking.
        panic::catch_unwind(AssertUnwindSafe(|| window.update(&display))).map_err(|cause| {
            let message = cause
                .downcast_ref::<String>()
                .cloned()
                .or_else(|| cause.downcast_ref::<&str>().map(|s| s.to_string()))
                .unwrap_or_else(|| "unknown SDL error".into());
            StartupError::Window(message)
        })?;

        Ok(Self {
            framebuffer: FrameBuffer::new(size),
            display,
            window,
        })
    }
}

fn map_keycode(keycode: Keycode) -> Option<Key> {
    if keycode == Keycode::Escape {
        return Some(Key::Escape);
    }
    let name = keycode.name();
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Some(Key::Char(c.to_ascii_lowercase())),
        _ => None,
    }
}

impl Surface for SdlSurface {
    type Target = FrameBuffer;

    fn bounds(&self) -> Rectangle {
        self.framebuffer.bounding_box()
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.window
            .events()
            .filter_map(|event| match event {
                SimulatorEvent::Quit => Some(InputEvent::Quit),
                SimulatorEvent::KeyDown { keycode, .. } => map_keycode(keycode).map(InputEvent::KeyDown),
                SimulatorEvent::MouseButtonDown { point, .. } => {
                    Some(InputEvent::Press(TouchPoint::from(point)))
                }
                SimulatorEvent::MouseButtonUp { point, .. } => {
                    Some(InputEvent::Release(TouchPoint::from(point)))
                }
                _ => None,
            })
            .inspect(|event| debug!("Input: {:?}", event))
            .collect()
    }

    fn target(&mut self) -> &mut FrameBuffer {
        &mut self.framebuffer
    }

    fn present(&mut self) {
        // SimulatorDisplay draws are infallible.
        let _ = self.framebuffer.flush(&mut self.display);
        self.window.update(&self.display);
    }
}

//! Window, input and presentation boundary
//!
//! The application loop only sees a [`Surface`]: something with a size that
//! yields input events, exposes an Rgb565 draw target for the frame and
//! presents it. [`HeadlessSurface`] replays scripted events into an
//! in-memory framebuffer; the SDL window lives behind the `sdl` feature.

#[cfg(feature = "sdl")]
mod sdl;

use std::collections::VecDeque;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

#[cfg(feature = "sdl")]
pub use sdl::SdlSurface;

use crate::framebuffer::FrameBuffer;
use crate::ui::TouchPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    /// Any other key, as a lowercase ASCII letter or digit.
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The window was closed.
    Quit,
    Press(TouchPoint),
    Release(TouchPoint),
    KeyDown(Key),
}

pub trait Surface {
    type Target: DrawTarget<Color = Rgb565>;

    /// Drawable area in pixels.
    fn bounds(&self) -> Rectangle;

    /// Input that arrived since the last call.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Target for the next frame.
    fn target(&mut self) -> &mut Self::Target;

    /// Show the frame drawn into [`Surface::target`].
    fn present(&mut self);
}

/// Surface without a window: renders into a [`FrameBuffer`].
///
/// Events are scripted per frame; each [`Surface::poll_events`] call returns
/// the next queued batch.
pub struct HeadlessSurface {
    framebuffer: FrameBuffer,
    script: VecDeque<Vec<InputEvent>>,
    presented: usize,
}

impl HeadlessSurface {
    pub fn new(size: Size) -> Self {
        Self {
            framebuffer: FrameBuffer::new(size),
            script: VecDeque::new(),
            presented: 0,
        }
    }

    /// Queue the events the next unscripted poll returns.
    pub fn push_events(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        self.script.push_back(events.into_iter().collect());
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> usize {
        self.presented
    }
}

impl Surface for HeadlessSurface {
    type Target = FrameBuffer;

    fn bounds(&self) -> Rectangle {
        self.framebuffer.bounding_box()
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.script.pop_front().unwrap_or_default()
    }

    fn target(&mut self) -> &mut FrameBuffer {
        &mut self.framebuffer
    }

    fn present(&mut self) {
        self.presented += 1;
    }
}

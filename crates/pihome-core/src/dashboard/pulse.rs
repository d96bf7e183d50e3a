//! Pulsating red used for panels whose sensor warns

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::*;

/// Steps in one pulse cycle. 72 * 25 degrees is five full sine periods, so
/// wrapping here keeps the waveform continuous.
pub const PULSE_STEPS: u8 = 72;

const DEGREES_PER_STEP: f32 = 25.0;

/// Phase offset in radians.
const PHASE_OFFSET: f32 = 1.0;

/// Opacity of the red overlay over the background.
const OVERLAY_ALPHA: f32 = 0.8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarningPulse {
    step: u8,
}

impl WarningPulse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    /// Move to the next frame's phase.
    pub fn advance(&mut self) {
        self.step = (self.step + 1) % PULSE_STEPS;
    }

    /// Red intensity in `[0.25, 0.75]`.
    pub fn intensity(&self) -> f32 {
        let angle = (f32::from(self.step) * DEGREES_PER_STEP).to_radians() + PHASE_OFFSET;
        angle.sin() / 4.0 + 0.5
    }

    /// The red overlay blended onto `background`.
    pub fn color_over(&self, background: Rgb565) -> Rgb565 {
        let background = Rgb888::from(background);
        let blend = |overlay: f32, under: u8| {
            (overlay * 255.0 * OVERLAY_ALPHA + f32::from(under) * (1.0 - OVERLAY_ALPHA))
                .round()
                .clamp(0.0, 255.0) as u8
        };

        Rgb565::from(Rgb888::new(
            blend(self.intensity(), background.r()),
            blend(0.0, background.g()),
            blend(0.0, background.b()),
        ))
    }
}

//! Color definitions and the dashboard palette
//!
//! All colors are RGB565. To convert from 8-bit RGB: R>>3, G>>2, B>>3.

use embedded_graphics::pixelcolor::Rgb565;

/// Window clear color, a pale blue (179, 179, 255)
pub const COLOR_CLEAR: Rgb565 = Rgb565::new(179 >> 3, 179 >> 2, 255 >> 3);

/// Panel body - near black
pub const COLOR_PANEL: Rgb565 = Rgb565::new(15 >> 3, 15 >> 2, 15 >> 3);

/// Panel title bar - dark blue
pub const COLOR_TITLE: Rgb565 = Rgb565::new(41 >> 3, 74 >> 2, 122 >> 3);

/// Button fill - medium blue
pub const COLOR_BUTTON: Rgb565 = Rgb565::new(38 >> 3, 92 >> 2, 158 >> 3);

/// Panel border - gray-blue
pub const COLOR_STROKE: Rgb565 = Rgb565::new(110 >> 3, 110 >> 2, 128 >> 3);

/// Alert text - bright yellow
pub const COLOR_ALERT_TEXT: Rgb565 = Rgb565::new(255 >> 3, 230 >> 2, 90 >> 3);

pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

pub const LIGHT_GRAY: Rgb565 = Rgb565::new(21, 42, 21);

/// The colors the dashboard is drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPalette {
    /// Screen background behind the panels
    pub clear: Rgb565,
    pub panel: Rgb565,
    pub title: Rgb565,
    pub button: Rgb565,
    pub border: Rgb565,
    pub text_primary: Rgb565,
    pub text_secondary: Rgb565,
    /// Text that must stand out on a warning panel
    pub alert_text: Rgb565,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            clear: COLOR_CLEAR,
            panel: COLOR_PANEL,
            title: COLOR_TITLE,
            button: COLOR_BUTTON,
            border: COLOR_STROKE,
            text_primary: WHITE,
            text_secondary: LIGHT_GRAY,
            alert_text: COLOR_ALERT_TEXT,
        }
    }
}

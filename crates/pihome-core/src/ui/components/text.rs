//! Single-line text labels

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text as EgText, TextStyleBuilder};

use crate::ui::core::Drawable;
use crate::ui::styling::Style;

/// Text size variants
///
/// - `Small`: 5x8 font
/// - `Medium`: 6x10 font (default)
/// - `Large`: 10x20 font
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

impl TextSize {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            TextSize::Small => &embedded_graphics::mono_font::ascii::FONT_5X8,
            TextSize::Medium => &FONT_6X10,
            TextSize::Large => &embedded_graphics::mono_font::ascii::FONT_10X20,
        }
    }

    /// Height of one line of this size in pixels.
    pub fn line_height(&self) -> u32 {
        self.font().character_size.height
    }
}

/// Styled text inside a bounding box, top-left aligned.
///
/// Text longer than 128 bytes is cut off. Text wider than the box minus its
/// horizontal padding is cut off at the last character that fits.
pub struct TextComponent {
    bounds: Rectangle,
    text: heapless::String<128>,
    size: TextSize,
    style: Style,
}

impl TextComponent {
    pub fn new(bounds: Rectangle, text: &str, size: TextSize) -> Self {
        let mut stored = heapless::String::new();
        for c in text.chars() {
            if stored.push(c).is_err() {
                break;
            }
        }
        Self {
            bounds,
            text: stored,
            size,
            style: Style::default(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// The part of the text that fits the box with the current padding.
    pub fn text(&self) -> &str {
        let font = self.size.font();
        let char_width = (font.character_size.width + font.character_spacing).max(1);
        let usable = self
            .bounds
            .size
            .width
            .saturating_sub(self.style.padding.horizontal());
        let max_chars = (usable / char_width) as usize;

        match self.text.char_indices().nth(max_chars) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }

    fn text_position(&self) -> Point {
        self.bounds.top_left
            + Point::new(
                self.style.padding.left as i32,
                self.style.padding.top as i32,
            )
    }
}

impl Drawable for TextComponent {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        if self.style.background_color.is_some() {
            self.bounds
                .into_styled(self.style.to_primitive_style())
                .draw(display)?;
        }

        let text_color = self.style.foreground_color.unwrap_or(Rgb565::WHITE);
        let character_style = MonoTextStyle::new(self.size.font(), text_color);
        let text_style = TextStyleBuilder::new().baseline(Baseline::Top).build();

        EgText::with_text_style(self.text(), self.text_position(), character_style, text_style)
            .draw(display)?;

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_text_is_cut_to_the_box() {
        // 60 px / 6 px per Medium character = 10 characters
        let text = TextComponent::new(
            Rectangle::new(Point::zero(), Size::new(60, 10)),
            "Detected counter 123456",
            TextSize::Medium,
        );
        assert_eq!(text.text(), "Detected c");
    }

    #[test]
    fn padding_narrows_the_visible_text() {
        use crate::framebuffer::FrameBuffer;
        use crate::ui::styling::Padding;

        let bounds = Rectangle::new(Point::zero(), Size::new(60, 10));
        let text = TextComponent::new(bounds, "abcdefghijklmnop", TextSize::Medium)
            .with_style(Style::new().with_padding(Padding::symmetric(0, 6)));
        // (60 - 12) px / 6 px per character
        assert_eq!(text.text(), "abcdefgh");

        let mut fb = FrameBuffer::new(Size::new(100, 10));
        text.draw(&mut fb).unwrap();
        let right_of_box = Rectangle::new(Point::new(60, 0), Size::new(40, 10));
        assert_eq!(fb.count_color(&right_of_box, Rgb565::WHITE), 0);
        assert!(fb.count_color(&bounds, Rgb565::WHITE) > 0);
    }
}

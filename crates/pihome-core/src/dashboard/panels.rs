//! Drawing of the individual panels

use std::fmt::Write;

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use super::layout::{BODY_PADDING, DashboardLayout, LINE_SPACING, PanelLayout};
use crate::camera::Texture;
use crate::sensors::{DhtReading, MotionData, Reading, SensorSnapshot};
use crate::ui::{
    Action, Button, ButtonVariant, ColorPalette, Drawable, Padding, Style, TextComponent, TextSize,
};

/// asctime() layout, e.g. "Sun Oct 19 14:03:07 2026".
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Writes text lines top to bottom inside a panel body.
struct LineWriter {
    area: Rectangle,
    y: i32,
    style: Style,
}

impl LineWriter {
    fn new(body: Rectangle, color: Rgb565) -> Self {
        let area = Rectangle::new(
            body.top_left + Point::new(BODY_PADDING as i32, BODY_PADDING as i32),
            Size::new(
                body.size.width.saturating_sub(2 * BODY_PADDING),
                body.size.height.saturating_sub(2 * BODY_PADDING),
            ),
        );
        Self {
            y: area.top_left.y,
            area,
            style: Style::new().with_foreground(color),
        }
    }

    fn line<D>(&mut self, display: &mut D, text: &str, size: TextSize) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let height = size.line_height();
        let bottom = self.area.top_left.y + self.area.size.height as i32;
        if self.y + height as i32 > bottom {
            return Ok(());
        }
        let bounds = Rectangle::new(
            Point::new(self.area.top_left.x, self.y),
            Size::new(self.area.size.width, height),
        );
        TextComponent::new(bounds, text, size)
            .with_style(self.style)
            .draw(display)?;
        self.y += (height + LINE_SPACING) as i32;
        Ok(())
    }

    fn colored<D>(
        &mut self,
        display: &mut D,
        text: &str,
        size: TextSize,
        color: Rgb565,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let previous = self.style;
        self.style = self.style.with_foreground(color);
        let result = self.line(display, text, size);
        self.style = previous;
        result
    }
}

/// Status panel: application name, frame statistics and the Exit button.
pub fn draw_status<D>(
    display: &mut D,
    layout: &DashboardLayout,
    status_line: &str,
    palette: &ColorPalette,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    layout
        .status
        .into_styled(
            Style::new()
                .with_background(palette.panel)
                .to_primitive_style(),
        )
        .draw(display)?;

    let text_width = layout
        .exit_button
        .top_left
        .x
        .saturating_sub(layout.status.top_left.x)
        .max(0) as u32;
    let title = Rectangle::new(
        layout.status.top_left,
        Size::new(text_width, TextSize::Large.line_height() + 4),
    );
    TextComponent::new(title, "piHome", TextSize::Large)
        .with_style(
            Style::new()
                .with_foreground(palette.text_primary)
                .with_padding(Padding::symmetric(2, 6)),
        )
        .draw(display)?;

    let stats = Rectangle::new(
        title.top_left + Point::new(0, title.size.height as i32),
        Size::new(text_width, TextSize::Small.line_height() + 4),
    );
    TextComponent::new(stats, status_line, TextSize::Small)
        .with_style(
            Style::new()
                .with_foreground(palette.text_secondary)
                .with_padding(Padding::symmetric(0, 6)),
        )
        .draw(display)?;

    Button::new(layout.exit_button, "Exit", Action::Exit)
        .with_palette(*palette)
        .draw(display)
}

/// One sensor panel. `alert` is the pulse color while the sensor warns.
pub fn draw_panel<D>(
    display: &mut D,
    panel: &PanelLayout,
    snapshot: &SensorSnapshot,
    palette: &ColorPalette,
    alert: Option<Rgb565>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let body_color = alert.unwrap_or(palette.panel);
    let title_color = alert.unwrap_or(palette.title);

    panel
        .bounds
        .into_styled(
            Style::new()
                .with_background(body_color)
                .with_border(palette.border, 1)
                .to_primitive_style(),
        )
        .draw(display)?;
    panel
        .title_bar
        .into_styled(PrimitiveStyle::with_fill(title_color))
        .draw(display)?;
    TextComponent::new(panel.title_bar, &snapshot.name, TextSize::Medium)
        .with_style(
            Style::new()
                .with_foreground(palette.text_primary)
                .with_padding(Padding::symmetric(3, 4)),
        )
        .draw(display)?;

    let mut lines = LineWriter::new(panel.body, palette.text_primary);
    match &snapshot.reading {
        Reading::Gas { detected } => {
            if *detected {
                lines.colored(display, "GAS detected", TextSize::Large, palette.alert_text)
            } else {
                lines.line(display, "OK", TextSize::Large)
            }
        }
        Reading::Motion(data) => draw_motion(display, &mut lines, data, palette),
        Reading::TempHumidity(reading) => draw_temp_humidity(display, &mut lines, *reading),
        Reading::Camera(image) => {
            lines.line(display, "Image", TextSize::Medium)?;
            if let Some(button) = panel.picture_button {
                Button::new(button, "Take picture", Action::TakePicture(panel.index))
                    .with_palette(*palette)
                    .with_variant(ButtonVariant::Outline)
                    .draw(display)?;
            }
            if let Some(area) = panel.image_area {
                match image.texture.as_ref() {
                    Some(texture) if !texture.pixels.is_empty() => {
                        draw_texture(display, area, texture)?
                    }
                    _ => draw_placeholder(display, area, palette)?,
                }
            }
            Ok(())
        }
    }
}

fn draw_motion<D>(
    display: &mut D,
    lines: &mut LineWriter,
    data: &MotionData,
    palette: &ColorPalette,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    if let Some(when) = data.last_detected {
        let mut stamp = heapless::String::<32>::new();
        write!(stamp, "{}", when.format(TIMESTAMP_FORMAT)).ok();
        lines.line(display, "Last detected local time and date:", TextSize::Small)?;
        lines.line(display, &stamp, TextSize::Medium)?;
    }

    let mut counter = heapless::String::<32>::new();
    write!(counter, "Detected counter {}", data.count).ok();
    lines.line(display, &counter, TextSize::Medium)?;

    if data.detected {
        lines.colored(display, "MOTION DETECTED", TextSize::Large, palette.alert_text)?;
    }
    Ok(())
}

fn draw_temp_humidity<D>(
    display: &mut D,
    lines: &mut LineWriter,
    reading: Option<DhtReading>,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let Some(reading) = reading else {
        return lines.line(display, "Waiting for first reading", TextSize::Medium);
    };

    let mut text = heapless::String::<32>::new();
    write!(text, "Temperature {:.1} C", reading.temperature_c).ok();
    lines.line(display, &text, TextSize::Large)?;

    text.clear();
    write!(text, "Humidity {:.1} %", reading.humidity_percent).ok();
    lines.line(display, &text, TextSize::Large)
}

/// Scale `texture` into `area`, nearest neighbour.
pub fn draw_texture<D>(display: &mut D, area: Rectangle, texture: &Texture) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let (w, h) = (area.size.width, area.size.height);
    if w == 0 || h == 0 || texture.width == 0 || texture.height == 0 {
        return Ok(());
    }

    let (tw, th) = (texture.width as u64, texture.height as u64);
    let pixels = (0..h).flat_map(move |y| {
        let src_row = (u64::from(y) * th / u64::from(h)) * tw;
        (0..w).map(move |x| {
            let src = src_row + u64::from(x) * tw / u64::from(w);
            texture
                .pixels
                .get(src as usize)
                .copied()
                .unwrap_or(Rgb565::BLACK)
        })
    });

    display.fill_contiguous(&area, pixels)
}

fn draw_placeholder<D>(display: &mut D, area: Rectangle, palette: &ColorPalette) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    area.into_styled(
        Style::new()
            .with_border(palette.border, 1)
            .to_primitive_style(),
    )
    .draw(display)?;

    let mut lines = LineWriter::new(area, palette.text_secondary);
    lines.line(display, "No picture taken yet", TextSize::Small)
}

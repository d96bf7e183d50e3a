//! Screen layout of the dashboard
//!
//! The status panel runs across the top. Sensor panels fill the rest in
//! registry order: one row when every column gets at least
//! [`MIN_COLUMN_WIDTH`] pixels, otherwise two rows.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::sensors::SensorKind;
use crate::ui::TextSize;

pub const STATUS_HEIGHT: u32 = 44;
pub const MARGIN: u32 = 6;
pub const TITLE_HEIGHT: u32 = 16;
pub const MIN_COLUMN_WIDTH: u32 = 200;
/// Inner padding of a panel body.
pub const BODY_PADDING: u32 = 6;
/// Vertical distance between two text lines in a panel body.
pub const LINE_SPACING: u32 = 4;

const EXIT_BUTTON_SIZE: Size = Size::new(72, 24);
const PICTURE_BUTTON_SIZE: Size = Size::new(110, 22);

/// Where one sensor's panel and its controls go.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    /// Registry index of the sensor.
    pub index: usize,
    pub kind: SensorKind,
    pub bounds: Rectangle,
    pub title_bar: Rectangle,
    pub body: Rectangle,
    /// "Take picture" button, camera panels only.
    pub picture_button: Option<Rectangle>,
    /// 4:3 image area below the button, camera panels only.
    pub image_area: Option<Rectangle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardLayout {
    pub status: Rectangle,
    pub exit_button: Rectangle,
    pub panels: Vec<PanelLayout>,
}

/// Columns and rows for `count` panels on a screen `width` pixels wide.
pub fn grid(count: usize, width: u32) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    if width / count as u32 >= MIN_COLUMN_WIDTH || count == 1 {
        (count, 1)
    } else {
        (count.div_ceil(2), 2)
    }
}

/// The largest `ratio_w:ratio_h` rectangle inside `area`, centered horizontally.
///
/// Sides are whole multiples of the ratio, so the result is exact.
pub fn fit_aspect(area: Rectangle, ratio_w: u32, ratio_h: u32) -> Rectangle {
    let units = (area.size.width / ratio_w).min(area.size.height / ratio_h);
    let size = Size::new(units * ratio_w, units * ratio_h);
    let x = area.top_left.x + ((area.size.width - size.width) / 2) as i32;
    Rectangle::new(Point::new(x, area.top_left.y), size)
}

/// Shrink `rect` by `amount` on every side.
fn inset(rect: Rectangle, amount: u32) -> Rectangle {
    Rectangle::new(
        rect.top_left + Point::new(amount as i32, amount as i32),
        Size::new(
            rect.size.width.saturating_sub(2 * amount),
            rect.size.height.saturating_sub(2 * amount),
        ),
    )
}

/// Remove `height` pixels from the top of `rect`.
fn below(rect: Rectangle, height: u32) -> Rectangle {
    let height = height.min(rect.size.height);
    Rectangle::new(
        rect.top_left + Point::new(0, height as i32),
        Size::new(rect.size.width, rect.size.height - height),
    )
}

impl DashboardLayout {
    /// Lay out the status panel and one panel per entry of `kinds`.
    pub fn compute(screen: Rectangle, kinds: &[SensorKind]) -> Self {
        let status = Rectangle::new(
            screen.top_left,
            Size::new(screen.size.width, STATUS_HEIGHT.min(screen.size.height)),
        );
        let exit_top_left = Point::new(
            status.top_left.x + status.size.width.saturating_sub(EXIT_BUTTON_SIZE.width + MARGIN)
                as i32,
            status.top_left.y
                + (status.size.height.saturating_sub(EXIT_BUTTON_SIZE.height) / 2) as i32,
        );
        let exit_button = Rectangle::new(exit_top_left, EXIT_BUTTON_SIZE).intersection(&status);

        let area = below(screen, STATUS_HEIGHT);
        let (cols, rows) = grid(kinds.len(), area.size.width);
        let mut panels = Vec::with_capacity(kinds.len());
        if cols == 0 {
            return Self {
                status,
                exit_button,
                panels,
            };
        }

        let panel_size = Size::new(
            area.size.width.saturating_sub(MARGIN * (cols as u32 + 1)) / cols as u32,
            area.size.height.saturating_sub(MARGIN * (rows as u32 + 1)) / rows as u32,
        );

        for (index, kind) in kinds.iter().copied().enumerate() {
            let (col, row) = ((index % cols) as u32, (index / cols) as u32);
            let top_left = area.top_left
                + Point::new(
                    (MARGIN + col * (panel_size.width + MARGIN)) as i32,
                    (MARGIN + row * (panel_size.height + MARGIN)) as i32,
                );
            let bounds = Rectangle::new(top_left, panel_size).intersection(&screen);
            panels.push(PanelLayout::new(index, kind, bounds));
        }

        Self {
            status,
            exit_button,
            panels,
        }
    }
}

impl PanelLayout {
    fn new(index: usize, kind: SensorKind, bounds: Rectangle) -> Self {
        let title_bar = Rectangle::new(
            bounds.top_left,
            Size::new(bounds.size.width, TITLE_HEIGHT.min(bounds.size.height)),
        );
        let body = below(bounds, TITLE_HEIGHT);

        let (picture_button, image_area) = if kind == SensorKind::Camera {
            let content = inset(body, BODY_PADDING);
            // "Image" label line, then the button, then the picture.
            let label = TextSize::Medium.line_height() + LINE_SPACING;
            let button = Rectangle::new(
                content.top_left + Point::new(0, label as i32),
                PICTURE_BUTTON_SIZE,
            )
            .intersection(&content);
            let rest = below(content, label + PICTURE_BUTTON_SIZE.height + LINE_SPACING);
            (Some(button), Some(fit_aspect(rest, 4, 3)))
        } else {
            (None, None)
        };

        Self {
            index,
            kind,
            bounds,
            title_bar,
            body,
            picture_button,
            image_area,
        }
    }
}

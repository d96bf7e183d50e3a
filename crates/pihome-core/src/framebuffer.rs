//! In-memory framebuffer with change tracking.
//!
//! The dashboard draws into this buffer. Presenting copies only the
//! rectangle that contains changed pixels to the real output.

use std::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::trace;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }
}

/// `DrawTarget<Color = Rgb565>` over a heap buffer sized at runtime.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb565>,
    dirty: Option<DirtyRect>,
}

impl FrameBuffer {
    /// Allocate a black framebuffer of `size`.
    pub fn new(size: Size) -> Self {
        let width = size.width as usize;
        let height = size.height as usize;
        Self {
            width,
            height,
            pixels: vec![Rgb565::BLACK; width * height],
            dirty: None,
        }
    }

    /// Color at `point`, `None` outside the buffer.
    pub fn pixel(&self, point: Point) -> Option<Rgb565> {
        self.index(point.x, point.y).map(|idx| self.pixels[idx])
    }

    /// Number of pixels in `area` that have `color`.
    pub fn count_color(&self, area: &Rectangle, color: Rgb565) -> usize {
        area.points()
            .filter(|p| self.pixel(*p) == Some(color))
            .count()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * self.width + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Copy the changed region to `display` and reset the change tracking.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let width = rect.max_x - rect.min_x + 1;
        let height = rect.max_y - rect.min_y + 1;
        trace!(
            "Flushing {}x{} dirty region at ({}, {})",
            width, height, rect.min_x, rect.min_y
        );

        let area = Rectangle::new(
            Point::new(rect.min_x as i32, rect.min_y as i32),
            Size::new(width as u32, height as u32),
        );

        let pixels = &self.pixels;
        let stride = self.width;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * stride + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&area, pixel_iter)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Some(idx) = self.index(coord.x, coord.y) {
                self.set_pixel(idx % self.width, idx / self.width, color);
            }
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // Colors are laid out over the unclipped area; skip the ones outside.
        let mut colors = colors.into_iter();
        for point in area.points() {
            let Some(color) = colors.next() else { break };
            if let Some(idx) = self.index(point.x, point.y) {
                self.set_pixel(idx % self.width, idx / self.width, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let clipped = area.intersection(&self.bounding_box());
        let Some(bottom_right) = clipped.bottom_right() else {
            return Ok(());
        };

        for y in clipped.top_left.y..=bottom_right.y {
            for x in clipped.top_left.x..=bottom_right.x {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..self.height {
            for x in 0..self.width {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;

    #[test]
    fn drawing_outside_is_clipped() {
        let mut fb = FrameBuffer::new(Size::new(4, 4));
        fb.fill_solid(
            &Rectangle::new(Point::new(-2, -2), Size::new(4, 4)),
            Rgb565::RED,
        )
        .unwrap();

        assert_eq!(fb.pixel(Point::new(0, 0)), Some(Rgb565::RED));
        assert_eq!(fb.pixel(Point::new(1, 1)), Some(Rgb565::RED));
        assert_eq!(fb.pixel(Point::new(2, 2)), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel(Point::new(4, 0)), None);
    }

    #[test]
    fn fill_contiguous_keeps_row_alignment_when_clipped() {
        let mut fb = FrameBuffer::new(Size::new(2, 2));
        let area = Rectangle::new(Point::new(-1, 0), Size::new(2, 2));
        let colors = [Rgb565::RED, Rgb565::GREEN, Rgb565::BLUE, Rgb565::WHITE];
        fb.fill_contiguous(&area, colors).unwrap();

        assert_eq!(fb.pixel(Point::new(0, 0)), Some(Rgb565::GREEN));
        assert_eq!(fb.pixel(Point::new(0, 1)), Some(Rgb565::WHITE));
        assert_eq!(fb.pixel(Point::new(1, 0)), Some(Rgb565::BLACK));
    }

    #[test]
    fn flush_sends_only_changed_region() {
        let mut fb = FrameBuffer::new(Size::new(8, 8));
        fb.fill_solid(&Rectangle::new(Point::new(2, 3), Size::new(2, 1)), Rgb565::RED)
            .unwrap();

        let mut display = MockDisplay::<Rgb565>::new();
        fb.flush(&mut display).unwrap();
        assert_eq!(display.affected_area(), Rectangle::new(Point::new(2, 3), Size::new(2, 1)));
        assert!(!fb.is_dirty());

        // Nothing changed since: flushing again is a no-op.
        let mut untouched = MockDisplay::<Rgb565>::new();
        fb.flush(&mut untouched).unwrap();
        assert_eq!(untouched.affected_area(), Rectangle::zero());
    }
}

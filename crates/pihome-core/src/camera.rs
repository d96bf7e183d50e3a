//! Still-image capture boundary and image buffers

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};

use crate::error::CameraError;

/// Bytes per pixel of the RGB888 capture format.
pub const RGB_BYTES_PER_PIXEL: usize = 3;

/// A device that captures single still images.
pub trait Camera {
    /// Capture one still. Blocks until the image is available.
    fn capture(&mut self) -> Result<CameraImage, CameraError>;
}

impl<C: Camera + ?Sized> Camera for Box<C> {
    fn capture(&mut self) -> Result<CameraImage, CameraError> {
        (**self).capture()
    }
}

/// Display-ready copy of an image, converted once when the image arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgb565>,
}

/// An RGB888 still plus its uploaded texture.
///
/// The default value is the empty image shown before the first capture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub texture: Option<Texture>,
}

impl CameraImage {
    /// Build an image from tightly packed RGB888 data.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CameraError> {
        let expected = width as usize * height as usize * RGB_BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(CameraError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
            texture: None,
        })
    }

    /// Build an image from RGB888 rows that may carry stride padding.
    ///
    /// Capture programs round the row length up to an alignment boundary;
    /// the padding at the end of every row is dropped.
    pub fn from_padded_rgb(width: u32, height: u32, raw: &[u8]) -> Result<Self, CameraError> {
        let row_len = width as usize * RGB_BYTES_PER_PIXEL;
        let expected = row_len * height as usize;
        let mismatch = || CameraError::SizeMismatch {
            width,
            height,
            expected,
            actual: raw.len(),
        };

        if height == 0 || raw.len() < expected || raw.len() % height as usize != 0 {
            return Err(mismatch());
        }

        let stride = raw.len() / height as usize;
        if stride == row_len {
            return Self::from_rgb(width, height, raw.to_vec());
        }

        let mut data = Vec::with_capacity(expected);
        for row in raw.chunks_exact(stride) {
            data.extend_from_slice(&row[..row_len]);
        }
        Self::from_rgb(width, height, data)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / RGB_BYTES_PER_PIXEL
    }

    /// Convert the RGB888 buffer into an Rgb565 texture tagged with `id`.
    pub fn upload(&mut self, id: u32) {
        let pixels = self
            .data
            .chunks_exact(RGB_BYTES_PER_PIXEL)
            .map(|px| Rgb565::from(Rgb888::new(px[0], px[1], px[2])))
            .collect();

        self.texture = Some(Texture {
            id,
            width: self.width,
            height: self.height,
            pixels,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::RgbColor;

    #[test]
    fn from_rgb_checks_length() {
        assert!(CameraImage::from_rgb(2, 2, vec![0; 12]).is_ok());
        let err = CameraImage::from_rgb(2, 2, vec![0; 11]).unwrap_err();
        assert!(matches!(
            err,
            CameraError::SizeMismatch {
                expected: 12,
                actual: 11,
                ..
            }
        ));
    }

    #[test]
    fn padded_rows_are_trimmed() {
        // 2x2 image, rows padded from 6 to 8 bytes.
        let raw = [1, 2, 3, 4, 5, 6, 0, 0, 7, 8, 9, 10, 11, 12, 0, 0];
        let image = CameraImage::from_padded_rgb(2, 2, &raw).unwrap();
        assert_eq!(image.data, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn short_buffer_is_rejected() {
        assert!(CameraImage::from_padded_rgb(4, 4, &[0; 10]).is_err());
    }

    #[test]
    fn upload_converts_every_pixel() {
        let mut image = CameraImage::from_rgb(2, 1, vec![255, 0, 0, 255, 255, 255]).unwrap();
        image.upload(7);

        let texture = image.texture.as_ref().unwrap();
        assert_eq!(texture.id, 7);
        assert_eq!(texture.pixels, vec![Rgb565::RED, Rgb565::WHITE]);
    }
}

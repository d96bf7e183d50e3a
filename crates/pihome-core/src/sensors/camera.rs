use std::sync::Arc;

use log::{info, warn};

use super::{Reading, Sensor, SensorKind, SensorSnapshot};
use crate::camera::{Camera, CameraImage};
use crate::error::CameraError;

/// Camera exposed as a sensor. Captures only on request.
pub struct CameraSensor<C> {
    name: Arc<str>,
    camera: C,
    image: Arc<CameraImage>,
    next_texture_id: u32,
}

impl<C: Camera> CameraSensor<C> {
    pub fn new(name: &str, camera: C) -> Self {
        Self {
            name: Arc::from(name),
            camera,
            image: Arc::new(CameraImage::default()),
            next_texture_id: 1,
        }
    }

    /// Capture a still and make it the current image.
    ///
    /// A failed capture keeps the previous image and is only logged.
    pub fn take_picture(&mut self) {
        if let Err(e) = self.try_take_picture() {
            warn!("{}: capture failed, keeping previous image: {}", self.name, e);
        }
    }

    fn try_take_picture(&mut self) -> Result<(), CameraError> {
        let captured = self.camera.capture()?;
        // Re-validate: the camera implementation is not trusted with the size.
        let mut image = CameraImage::from_rgb(captured.width, captured.height, captured.data)?;
        image.upload(self.next_texture_id);
        self.next_texture_id = self.next_texture_id.wrapping_add(1);

        info!(
            "{}: captured {}x{} image",
            self.name, image.width, image.height
        );
        self.image = Arc::new(image);
        Ok(())
    }

    pub fn image(&self) -> &CameraImage {
        &self.image
    }
}

impl<C: Camera> Sensor for CameraSensor<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SensorKind {
        SensorKind::Camera
    }

    /// Capturing is on demand only.
    fn update(&mut self) {}

    fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            name: self.name.clone(),
            warning: false,
            reading: Reading::Camera(self.image.clone()),
        }
    }
}

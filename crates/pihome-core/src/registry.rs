//! Ordered set of the active sensors.

use log::debug;

use crate::sensors::{Hardware, Sensor, SensorSnapshot, SensorWrapper};

/// Sensors in registration order.
///
/// The order never changes after registration and is the order sensors are
/// polled in and the order their panels are laid out in.
pub struct SensorRegistry<H: Hardware> {
    sensors: Vec<SensorWrapper<H>>,
}

impl<H: Hardware> Default for SensorRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Hardware> SensorRegistry<H> {
    pub fn new() -> Self {
        Self {
            sensors: Vec::new(),
        }
    }

    /// Register a sensor and return its index.
    pub fn register(&mut self, sensor: SensorWrapper<H>) -> usize {
        debug!("Registering {} sensor '{}'", sensor.kind().label(), sensor.name());
        self.sensors.push(sensor);
        self.sensors.len() - 1
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorWrapper<H>> {
        self.sensors.iter()
    }

    pub fn get(&self, index: usize) -> Option<&SensorWrapper<H>> {
        self.sensors.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SensorWrapper<H>> {
        self.sensors.get_mut(index)
    }

    pub fn names(&self) -> Vec<&str> {
        self.sensors.iter().map(|sensor| sensor.name()).collect()
    }

    /// Poll every sensor once, in order.
    pub fn update_all(&mut self) {
        for sensor in &mut self.sensors {
            sensor.update();
        }
    }

    pub fn snapshots(&self) -> Vec<SensorSnapshot> {
        self.sensors.iter().map(|sensor| sensor.snapshot()).collect()
    }

    /// Trigger a capture on the camera at `index`.
    ///
    /// Returns `false` if there is no camera at that index.
    pub fn take_picture(&mut self, index: usize) -> bool {
        match self.get_mut(index).and_then(SensorWrapper::as_camera_mut) {
            Some(camera) => {
                camera.take_picture();
                true
            }
            None => {
                debug!("No camera sensor at index {}", index);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::Polarity;
    use crate::sensors::{CameraSensor, GasSensor, SensorKind};
    use crate::sim::{SimCamera, SimHardware, SimInput};

    #[test]
    fn take_picture_only_reaches_cameras() {
        let camera = SimCamera::new(4, 3);
        let mut registry = SensorRegistry::<SimHardware>::new();
        registry.register(SensorWrapper::Gas(GasSensor::new(
            "gas",
            SimInput::new(true),
            Polarity::ActiveLow,
        )));
        let index = registry.register(SensorWrapper::Camera(CameraSensor::new(
            "cam",
            camera.clone(),
        )));

        assert!(!registry.take_picture(0));
        assert!(!registry.take_picture(7));
        assert!(registry.take_picture(index));
        assert_eq!(camera.captures(), 1);
        assert_eq!(registry.get(index).map(|s| s.kind()), Some(SensorKind::Camera));
    }
}

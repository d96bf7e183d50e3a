use std::sync::Arc;

use chrono::Local;
use embedded_hal::digital::InputPin;
use log::{debug, info};

use super::{MotionData, Reading, Sensor, SensorKind, SensorSnapshot};
use crate::gpio::Polarity;

/// PIR motion detector.
///
/// Counts detection edges (false -> true transitions of the output) and
/// remembers the local time of the most recent one.
pub struct MotionSensor<P> {
    name: Arc<str>,
    pin: P,
    polarity: Polarity,
    data: MotionData,
}

impl<P: InputPin> MotionSensor<P> {
    pub fn new(name: &str, pin: P, polarity: Polarity) -> Self {
        Self {
            name: Arc::from(name),
            pin,
            polarity,
            data: MotionData::default(),
        }
    }

    pub fn data(&self) -> MotionData {
        self.data
    }
}

impl<P: InputPin> Sensor for MotionSensor<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SensorKind {
        SensorKind::Motion
    }

    fn update(&mut self) {
        let detected = match self.polarity.is_active(&mut self.pin) {
            Ok(detected) => detected,
            Err(e) => {
                debug!("{}: pin read failed, keeping previous state: {:?}", self.name, e);
                return;
            }
        };

        if detected && !self.data.detected {
            self.data.count = self.data.count.saturating_add(1);
            self.data.last_detected = Some(Local::now());
            info!("{}: motion detected (#{})", self.name, self.data.count);
        }
        self.data.detected = detected;
    }

    fn warning(&self) -> bool {
        self.data.detected
    }

    fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            name: self.name.clone(),
            warning: self.warning(),
            reading: Reading::Motion(self.data),
        }
    }
}

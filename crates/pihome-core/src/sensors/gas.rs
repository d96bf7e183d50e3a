use std::sync::Arc;

use embedded_hal::digital::InputPin;
use log::{debug, info};

use super::{Reading, Sensor, SensorKind, SensorSnapshot};
use crate::gpio::Polarity;

/// MQ-135 style gas detector read through its digital threshold output.
pub struct GasSensor<P> {
    name: Arc<str>,
    pin: P,
    polarity: Polarity,
    detected: bool,
}

impl<P: InputPin> GasSensor<P> {
    pub fn new(name: &str, pin: P, polarity: Polarity) -> Self {
        Self {
            name: Arc::from(name),
            pin,
            polarity,
            detected: false,
        }
    }

    pub fn detected(&self) -> bool {
        self.detected
    }
}

impl<P: InputPin> Sensor for GasSensor<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SensorKind {
        SensorKind::Gas
    }

    fn update(&mut self) {
        match self.polarity.is_active(&mut self.pin) {
            Ok(detected) => {
                if detected != self.detected {
                    info!(
                        "{}: {}",
                        self.name,
                        if detected { "gas detected" } else { "gas cleared" }
                    );
                }
                self.detected = detected;
            }
            Err(e) => debug!("{}: pin read failed, keeping previous state: {:?}", self.name, e),
        }
    }

    fn warning(&self) -> bool {
        self.detected
    }

    fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            name: self.name.clone(),
            warning: self.warning(),
            reading: Reading::Gas {
                detected: self.detected,
            },
        }
    }
}

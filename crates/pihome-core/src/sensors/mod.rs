//! Sensor capability trait and the closed family of piHome sensors
//!
//! Every sensor implements [`Sensor`]: one synchronous hardware poll per
//! [`Sensor::update`], a constant name, and a warning flag derived from the
//! latest reading. Read failures are normal outcomes; a sensor logs them and
//! keeps its previous state.
//!
//! The renderer needs kind-specific data (an image for the camera, a counter
//! for the motion detector), so sensors also produce a [`SensorSnapshot`]
//! whose [`Reading`] is tagged by [`SensorKind`]. [`SensorWrapper`] is the
//! enum the registry stores; it delegates to the concrete sensor without
//! trait objects, the same way pages are wrapped in the UI.

mod camera;
mod dht;
mod gas;
mod motion;

use std::sync::Arc;

use chrono::{DateTime, Local};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

pub use camera::CameraSensor;
pub use dht::{DhtReading, TempHumiditySensor, decode_frame, verify_checksum};
pub use gas::GasSensor;
pub use motion::MotionSensor;

use crate::camera::{Camera, CameraImage};
use crate::gpio::DualModePin;

/// Explicit kind tag the renderer switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Gas,
    Motion,
    Camera,
    TempHumidity,
}

impl SensorKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gas => "gas",
            Self::Motion => "motion",
            Self::Camera => "camera",
            Self::TempHumidity => "temperature/humidity",
        }
    }
}

/// State of a motion detector at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionData {
    pub detected: bool,
    pub count: u32,
    pub last_detected: Option<DateTime<Local>>,
}

/// Kind-specific payload of a [`SensorSnapshot`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Gas { detected: bool },
    Motion(MotionData),
    Camera(Arc<CameraImage>),
    TempHumidity(Option<DhtReading>),
}

impl Reading {
    pub fn kind(&self) -> SensorKind {
        match self {
            Reading::Gas { .. } => SensorKind::Gas,
            Reading::Motion(_) => SensorKind::Motion,
            Reading::Camera(_) => SensorKind::Camera,
            Reading::TempHumidity(_) => SensorKind::TempHumidity,
        }
    }
}

/// Immutable copy of one sensor's state, safe to hand to another thread.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSnapshot {
    pub name: Arc<str>,
    pub warning: bool,
    pub reading: Reading,
}

impl SensorSnapshot {
    pub fn kind(&self) -> SensorKind {
        self.reading.kind()
    }
}

/// Capability shared by every sensor.
pub trait Sensor {
    /// Display name, constant after construction.
    fn name(&self) -> &str;

    fn kind(&self) -> SensorKind;

    /// Perform exactly one hardware poll and refresh the internal state.
    ///
    /// Never fails: a failed read leaves the previous state untouched.
    fn update(&mut self);

    /// Whether the latest reading is alert-worthy.
    fn warning(&self) -> bool {
        false
    }

    fn snapshot(&self) -> SensorSnapshot;
}

/// The hardware types one platform provides to the sensors.
pub trait Hardware {
    /// Digital input for the gas and motion outputs.
    type Input: InputPin + Send + 'static;
    /// Bidirectional line for the DHT bus.
    type DhtLine: DualModePin + Send + 'static;
    /// Delay used for the DHT bit timing.
    type Delay: DelayNs + Send + 'static;
    type Camera: Camera + Send + 'static;
}

/// Enum wrapper over the concrete sensor types.
///
/// When adding a sensor kind, add a variant here and the delegation in the
/// [`Sensor`] impl below.
pub enum SensorWrapper<H: Hardware> {
    Gas(GasSensor<H::Input>),
    Motion(MotionSensor<H::Input>),
    Camera(CameraSensor<H::Camera>),
    TempHumidity(TempHumiditySensor<H::DhtLine, H::Delay>),
}

impl<H: Hardware> SensorWrapper<H> {
    /// The capture capability, present only on camera sensors.
    pub fn as_camera_mut(&mut self) -> Option<&mut CameraSensor<H::Camera>> {
        match self {
            SensorWrapper::Camera(camera) => Some(camera),
            _ => None,
        }
    }
}

impl<H: Hardware> Sensor for SensorWrapper<H> {
    fn name(&self) -> &str {
        match self {
            SensorWrapper::Gas(sensor) => sensor.name(),
            SensorWrapper::Motion(sensor) => sensor.name(),
            SensorWrapper::Camera(sensor) => sensor.name(),
            SensorWrapper::TempHumidity(sensor) => sensor.name(),
        }
    }

    fn kind(&self) -> SensorKind {
        match self {
            SensorWrapper::Gas(sensor) => sensor.kind(),
            SensorWrapper::Motion(sensor) => sensor.kind(),
            SensorWrapper::Camera(sensor) => sensor.kind(),
            SensorWrapper::TempHumidity(sensor) => sensor.kind(),
        }
    }

    fn update(&mut self) {
        match self {
            SensorWrapper::Gas(sensor) => sensor.update(),
            SensorWrapper::Motion(sensor) => sensor.update(),
            SensorWrapper::Camera(sensor) => sensor.update(),
            SensorWrapper::TempHumidity(sensor) => sensor.update(),
        }
    }

    fn warning(&self) -> bool {
        match self {
            SensorWrapper::Gas(sensor) => sensor.warning(),
            SensorWrapper::Motion(sensor) => sensor.warning(),
            SensorWrapper::Camera(sensor) => sensor.warning(),
            SensorWrapper::TempHumidity(sensor) => sensor.warning(),
        }
    }

    fn snapshot(&self) -> SensorSnapshot {
        match self {
            SensorWrapper::Gas(sensor) => sensor.snapshot(),
            SensorWrapper::Motion(sensor) => sensor.snapshot(),
            SensorWrapper::Camera(sensor) => sensor.snapshot(),
            SensorWrapper::TempHumidity(sensor) => sensor.snapshot(),
        }
    }
}

//! Simulated hardware
//!
//! Cloneable handles over shared state: keep one clone inside the sensor and
//! drive the other from a test or from the desktop simulator's keyboard.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};

use crate::camera::{Camera, CameraImage, RGB_BYTES_PER_PIXEL};
use crate::error::CameraError;
use crate::gpio::DualModePin;
use crate::sensors::{DhtReading, Hardware};

/// Error returned by simulated pins that are set to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPinError;

impl digital::Error for SimPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Default)]
struct InputState {
    level: AtomicBool,
    failing: AtomicBool,
}

/// Digital input whose level is set from the outside.
#[derive(Debug, Clone, Default)]
pub struct SimInput {
    state: Arc<InputState>,
}

impl SimInput {
    pub fn new(level: bool) -> Self {
        let input = Self::default();
        input.set_level(level);
        input
    }

    pub fn set_level(&self, high: bool) {
        self.state.level.store(high, Ordering::SeqCst);
    }

    pub fn level(&self) -> bool {
        self.state.level.load(Ordering::SeqCst)
    }

    pub fn toggle(&self) -> bool {
        !self.state.level.fetch_xor(true, Ordering::SeqCst)
    }

    /// While failing, every read returns [`SimPinError`].
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }
}

impl ErrorType for SimInput {
    type Error = SimPinError;
}

impl InputPin for SimInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        if self.state.failing.load(Ordering::SeqCst) {
            return Err(SimPinError);
        }
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

#[derive(Debug)]
struct CameraState {
    width: u32,
    height: u32,
    failing: bool,
    truncated: bool,
    captures: u32,
}

/// Camera producing a gradient test pattern that shifts with every capture.
#[derive(Debug, Clone)]
pub struct SimCamera {
    state: Arc<Mutex<CameraState>>,
}

impl SimCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(CameraState {
                width,
                height,
                failing: false,
                truncated: false,
                captures: 0,
            })),
        }
    }

    /// Number of capture attempts so far, failed ones included.
    pub fn captures(&self) -> u32 {
        self.state.lock().map(|state| state.captures).unwrap_or(0)
    }

    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.failing = failing;
        }
    }

    /// Deliver images whose buffer is one pixel short of the stated size.
    pub fn set_truncated(&self, truncated: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.truncated = truncated;
        }
    }
}

impl Camera for SimCamera {
    fn capture(&mut self) -> Result<CameraImage, CameraError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| CameraError::Unavailable("simulated camera state poisoned".into()))?;
        state.captures += 1;
        if state.failing {
            return Err(CameraError::CaptureFailed {
                status: "exit status: 1".into(),
                stderr: "simulated capture failure".into(),
            });
        }

        let (width, height) = (state.width, state.height);
        let shift = (state.captures * 32) as u8 as u32;
        let mut data =
            Vec::with_capacity(width as usize * height as usize * RGB_BYTES_PER_PIXEL);
        for y in 0..height {
            for x in 0..width {
                data.push(((x * 255 / width.max(1) + shift) % 256) as u8);
                data.push((y * 255 / height.max(1)) as u8);
                data.push(((x + y + shift) % 256) as u8);
            }
        }
        if state.truncated {
            data.truncate(data.len().saturating_sub(RGB_BYTES_PER_PIXEL));
        }

        // Bypasses the length check on purpose so sensors see the bad buffer.
        Ok(CameraImage {
            width,
            height,
            data,
            texture: None,
        })
    }
}

/// Encode a reading as a DHT22 frame with a valid checksum.
pub fn encode_frame(reading: DhtReading) -> [u8; 5] {
    let humidity = (reading.humidity_percent * 10.0).round().clamp(0.0, 1000.0) as u16;
    let temperature = (reading.temperature_c.abs() * 10.0).round().min(1250.0) as u16;
    let sign = if reading.temperature_c < 0.0 { 0x80 } else { 0 };

    let mut frame = [
        (humidity >> 8) as u8,
        humidity as u8,
        (temperature >> 8) as u8 | sign,
        temperature as u8,
        0,
    ];
    frame[4] = frame[..4].iter().fold(0u8, |sum, b| sum.wrapping_add(*b));
    frame
}

/// Line idle (pulled up) before the sensor answers.
const IDLE_SAMPLES: usize = 5;
/// Low part of the response and of every bit.
const LOW_SAMPLES: usize = 20;
/// High part of the response.
const RESPONSE_HIGH_SAMPLES: usize = 20;
const ZERO_HIGH_SAMPLES: usize = 10;
const ONE_HIGH_SAMPLES: usize = 40;

#[derive(Debug, Default)]
struct DhtState {
    frame: [u8; 5],
    stuck: bool,
    output: bool,
    start_signals: u32,
    waveform: Vec<bool>,
    position: usize,
}

impl DhtState {
    /// Samples the host reads after releasing the line, one per poll.
    fn build_waveform(&mut self) {
        let mut levels = Vec::new();
        levels.extend(std::iter::repeat_n(true, IDLE_SAMPLES));
        levels.extend(std::iter::repeat_n(false, LOW_SAMPLES));
        levels.extend(std::iter::repeat_n(true, RESPONSE_HIGH_SAMPLES));
        for byte in self.frame {
            for bit in (0..8).rev() {
                let high = if byte >> bit & 1 == 1 {
                    ONE_HIGH_SAMPLES
                } else {
                    ZERO_HIGH_SAMPLES
                };
                levels.extend(std::iter::repeat_n(false, LOW_SAMPLES));
                levels.extend(std::iter::repeat_n(true, high));
            }
        }
        levels.extend(std::iter::repeat_n(false, LOW_SAMPLES));
        self.waveform = levels;
        self.position = 0;
    }
}

/// DHT bus that answers every start signal with a scripted frame.
///
/// After the frame the line idles high, so a host that keeps sampling sees
/// the level stop changing.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDhtLine {
    state: Arc<Mutex<DhtState>>,
}

impl ScriptedDhtLine {
    pub fn new(frame: [u8; 5]) -> Self {
        let line = Self::default();
        line.set_frame(frame);
        line
    }

    /// Frame sent in answer to the next start signal.
    pub fn set_frame(&self, frame: [u8; 5]) {
        if let Ok(mut state) = self.state.lock() {
            state.frame = frame;
        }
    }

    pub fn set_reading(&self, reading: DhtReading) {
        self.set_frame(encode_frame(reading));
    }

    /// A stuck line stays high and never answers.
    pub fn set_stuck(&self, stuck: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.stuck = stuck;
        }
    }

    pub fn start_signals(&self) -> u32 {
        self.state.lock().map(|state| state.start_signals).unwrap_or(0)
    }
}

impl ErrorType for ScriptedDhtLine {
    type Error = SimPinError;
}

impl InputPin for ScriptedDhtLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let mut state = self.state.lock().map_err(|_| SimPinError)?;
        if state.stuck || state.output {
            return Ok(true);
        }
        let level = state.waveform.get(state.position).copied().unwrap_or(true);
        state.position += 1;
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl OutputPin for ScriptedDhtLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.lock().map_err(|_| SimPinError)?;
        if state.output {
            state.start_signals += 1;
            if state.stuck {
                state.waveform.clear();
            } else {
                state.build_waveform();
            }
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl DualModePin for ScriptedDhtLine {
    fn set_as_input(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.lock().map_err(|_| SimPinError)?;
        state.output = false;
        state.position = 0;
        Ok(())
    }

    fn set_as_output(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.lock().map_err(|_| SimPinError)?;
        state.output = true;
        Ok(())
    }
}

/// Delay that returns immediately; simulated lines advance per read.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Delay that only records how long it was asked to wait.
#[derive(Debug, Default, Clone)]
pub struct RecordingDelay {
    total_ns: Arc<AtomicU64>,
}

impl RecordingDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns.load(Ordering::SeqCst) / 1_000_000
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.fetch_add(u64::from(ns), Ordering::SeqCst);
    }
}

/// Hardware bundle of the simulated devices.
#[derive(Debug, Clone, Copy)]
pub struct SimHardware;

impl Hardware for SimHardware {
    type Input = SimInput;
    type DhtLine = ScriptedDhtLine;
    type Delay = NoopDelay;
    type Camera = SimCamera;
}

//! DHT11/DHT22 temperature and humidity sensor on a single GPIO line
//!
//! The host pulls the line low for 18 ms to request a frame, releases it and
//! then times the level changes the sensor produces. Each data bit is a low
//! pulse followed by a high pulse whose length encodes the bit: a short high
//! is 0, a long high is 1. The frame is 40 bits: humidity (2 bytes),
//! temperature (2 bytes) and a checksum byte.

use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use super::{Reading, Sensor, SensorKind, SensorSnapshot};
use crate::error::SensorError;
use crate::gpio::DualModePin;

const SENSOR: &str = "DHT";

/// Host start signal length.
const START_SIGNAL_MS: u32 = 18;

/// A level that does not change within this many polls ends the frame.
const MAX_POLLS_PER_LEVEL: u32 = 255;

/// High pulses longer than this many 1 us polls are 1 bits.
const ONE_BIT_THRESHOLD: u32 = 16;

/// Level changes before the first data bit (release, response low/high, first low).
const PREAMBLE_TRANSITIONS: u32 = 4;

const FRAME_BITS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DhtReading {
    pub temperature_c: f32,
    pub humidity_percent: f32,
}

/// Check the trailing checksum byte of a raw frame.
pub fn verify_checksum(frame: &[u8; 5]) -> Result<(), SensorError> {
    let expected = frame[..4]
        .iter()
        .fold(0u8, |sum, byte| sum.wrapping_add(*byte));
    if expected == frame[4] {
        Ok(())
    } else {
        Err(SensorError::ChecksumMismatch {
            sensor: SENSOR,
            expected,
            actual: frame[4],
        })
    }
}

/// Decode a checksummed frame.
///
/// Values are read in the DHT22 layout (tenths, 16 bit). A DHT11 sends
/// integral values in the high bytes, which decode out of range in that
/// layout and fall back to the high byte alone.
pub fn decode_frame(frame: &[u8; 5]) -> Result<DhtReading, SensorError> {
    verify_checksum(frame)?;

    let mut humidity = f32::from(u16::from(frame[0]) << 8 | u16::from(frame[1])) / 10.0;
    if humidity > 100.0 {
        humidity = f32::from(frame[0]);
    }

    let mut temperature = f32::from(u16::from(frame[2] & 0x7F) << 8 | u16::from(frame[3])) / 10.0;
    if temperature > 125.0 {
        temperature = f32::from(frame[2]);
    }
    if frame[2] & 0x80 != 0 {
        temperature = -temperature;
    }

    Ok(DhtReading {
        temperature_c: temperature,
        humidity_percent: humidity,
    })
}

/// Temperature/humidity sensor with a bounded timing budget per frame.
pub struct TempHumiditySensor<P, D> {
    name: Arc<str>,
    line: P,
    delay: D,
    max_timings: u32,
    reading: Option<DhtReading>,
}

impl<P: DualModePin, D: DelayNs> TempHumiditySensor<P, D> {
    pub fn new(name: &str, line: P, delay: D, max_timings: u32) -> Self {
        Self {
            name: Arc::from(name),
            line,
            delay,
            max_timings,
            reading: None,
        }
    }

    pub fn reading(&self) -> Option<DhtReading> {
        self.reading
    }

    fn read_frame(&mut self) -> Result<[u8; 5], SensorError> {
        let pin_error = |operation: &'static str| {
            move |e: P::Error| SensorError::ReadFailed {
                sensor: SENSOR,
                operation,
                details: format!("{e:?}"),
            }
        };

        self.line
            .set_as_output()
            .map_err(pin_error("switch line to output"))?;
        self.line.set_low().map_err(pin_error("send start signal"))?;
        self.delay.delay_ms(START_SIGNAL_MS);
        self.line
            .set_as_input()
            .map_err(pin_error("release line"))?;

        let mut frame = [0u8; 5];
        let mut bits = 0usize;
        let mut last_level = true;

        for transition in 0..self.max_timings {
            let mut polls = 0u32;
            let level = loop {
                let level = self.line.is_high().map_err(pin_error("sample line"))?;
                if level != last_level {
                    break Some(level);
                }
                polls += 1;
                self.delay.delay_us(1);
                if polls == MAX_POLLS_PER_LEVEL {
                    break None;
                }
            };

            // Line stopped toggling: the frame is over (or never started).
            let Some(level) = level else { break };
            last_level = level;

            // Even transitions from the preamble on close a high pulse: one data bit.
            if transition >= PREAMBLE_TRANSITIONS && transition % 2 == 0 && bits < FRAME_BITS {
                let byte = &mut frame[bits / 8];
                *byte <<= 1;
                if polls > ONE_BIT_THRESHOLD {
                    *byte |= 1;
                }
                bits += 1;
            }
        }

        if bits < FRAME_BITS {
            return Err(if bits == 0 {
                SensorError::Timeout {
                    sensor: SENSOR,
                    operation: "receive a frame",
                }
            } else {
                SensorError::IncompleteFrame {
                    sensor: SENSOR,
                    bits,
                }
            });
        }

        Ok(frame)
    }
}

impl<P: DualModePin, D: DelayNs> Sensor for TempHumiditySensor<P, D> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SensorKind {
        SensorKind::TempHumidity
    }

    fn update(&mut self) {
        match self.read_frame().and_then(|frame| decode_frame(&frame)) {
            Ok(reading) => {
                if self.reading.is_none() {
                    info!(
                        "{}: first reading {:.1} C, {:.1} %",
                        self.name, reading.temperature_c, reading.humidity_percent
                    );
                }
                self.reading = Some(reading);
            }
            Err(e) => debug!("{}: {}, keeping previous reading", self.name, e),
        }
    }

    fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            name: self.name.clone(),
            warning: false,
            reading: Reading::TempHumidity(self.reading),
        }
    }
}

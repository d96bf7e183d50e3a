//! Raspberry Pi adapters for piHome
//!
//! Everything here talks to real hardware: rppal GPIO lines, the
//! `rpicam-still` capture program and the Linux framebuffer. The dashboard,
//! sensors and loop live in `pihome-core`; [`PiHardware`] plugs these
//! adapters into it.

pub mod camera;
pub mod display;
pub mod gpio;

use pihome_core::gpio::StdDelay;
use pihome_core::sensors::Hardware;

pub use camera::RpicamCamera;
pub use gpio::{GpioInput, GpioLine};

/// Hardware bundle of a Raspberry Pi.
pub struct PiHardware;

impl Hardware for PiHardware {
    type Input = GpioInput;
    type DhtLine = GpioLine;
    type Delay = StdDelay;
    type Camera = RpicamCamera;
}

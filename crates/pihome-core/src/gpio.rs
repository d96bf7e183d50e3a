//! GPIO seams shared by the sensor drivers
//!
//! Plain digital inputs use `embedded_hal::digital::InputPin` directly. The
//! DHT single-wire bus needs one line that is first driven as an output and
//! then sampled as an input, which [`DualModePin`] adds on top of the
//! embedded-hal traits.

use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// A GPIO line that can be switched between input and output mode at runtime.
pub trait DualModePin: InputPin + OutputPin {
    /// Switch the line to input mode (release the bus).
    fn set_as_input(&mut self) -> Result<(), Self::Error>;

    /// Switch the line to output mode so it can be driven.
    fn set_as_output(&mut self) -> Result<(), Self::Error>;
}

/// Which electrical level means "detected" for a binary sensor output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    pub fn from_active_low(active_low: bool) -> Self {
        if active_low {
            Self::ActiveLow
        } else {
            Self::ActiveHigh
        }
    }

    /// Read `pin` and report whether it sits at the active level.
    pub fn is_active<P: InputPin>(self, pin: &mut P) -> Result<bool, P::Error> {
        match self {
            Self::ActiveHigh => pin.is_high(),
            Self::ActiveLow => pin.is_low(),
        }
    }
}

/// Below this the scheduler overshoots badly, so short delays busy-wait.
const SPIN_THRESHOLD: Duration = Duration::from_micros(100);

/// `DelayNs` for Linux hosts: spins for microsecond delays, sleeps otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        let duration = Duration::from_nanos(u64::from(ns));
        if duration < SPIN_THRESHOLD {
            let start = Instant::now();
            while start.elapsed() < duration {
                std::hint::spin_loop();
            }
        } else {
            std::thread::sleep(duration);
        }
    }
}

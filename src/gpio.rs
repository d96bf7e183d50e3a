//! rppal pins behind the embedded-hal digital traits
//!
//! Level reads through `/dev/gpiomem` cannot fail once the pin is acquired,
//! so both adapters use `Infallible` as their error type.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use log::debug;
use pihome_core::error::StartupError;
use pihome_core::gpio::DualModePin;
use rppal::gpio::{Gpio, IoPin, Level, Mode};

fn acquire(gpio: &Gpio, bcm: u8) -> Result<rppal::gpio::Pin, StartupError> {
    gpio.get(bcm)
        .map_err(|e| StartupError::Gpio(format!("BCM {bcm}: {e}")))
}

/// A pin configured as a plain input (gas and motion outputs).
pub struct GpioInput {
    pin: rppal::gpio::InputPin,
}

impl GpioInput {
    pub fn new(gpio: &Gpio, bcm: u8) -> Result<Self, StartupError> {
        let pin = acquire(gpio, bcm)?.into_input();
        debug!("BCM {} configured as input", bcm);
        Ok(Self { pin })
    }
}

impl ErrorType for GpioInput {
    type Error = Infallible;
}

impl InputPin for GpioInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pin.is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pin.is_low())
    }
}

/// A pin whose mode is switched at runtime (the DHT data line).
pub struct GpioLine {
    pin: IoPin,
}

impl GpioLine {
    /// Acquire `bcm`, starting in input mode so the bus idles high.
    pub fn new(gpio: &Gpio, bcm: u8) -> Result<Self, StartupError> {
        let pin = acquire(gpio, bcm)?.into_io(Mode::Input);
        debug!("BCM {} configured as bidirectional line", bcm);
        Ok(Self { pin })
    }
}

impl ErrorType for GpioLine {
    type Error = Infallible;
}

impl InputPin for GpioLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pin.read() == Level::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pin.read() == Level::Low)
    }
}

impl OutputPin for GpioLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high();
        Ok(())
    }
}

impl DualModePin for GpioLine {
    fn set_as_input(&mut self) -> Result<(), Self::Error> {
        self.pin.set_mode(Mode::Input);
        Ok(())
    }

    fn set_as_output(&mut self) -> Result<(), Self::Error> {
        self.pin.set_mode(Mode::Output);
        Ok(())
    }
}

//! piHome on the Raspberry Pi
//!
//! Brings the system up in order (logger, configuration, GPIO, sensors,
//! window), runs the dashboard loop until the window is closed or Exit is
//! pressed, then releases everything. Any startup failure ends the process
//! with a non-zero exit code before the loop starts.

use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info};
use rppal::gpio::Gpio;

use pihome::display;
use pihome::{GpioInput, GpioLine, PiHardware, RpicamCamera};
use pihome_core::diagnostics::LogDiagnostics;
use pihome_core::gpio::{Polarity, StdDelay};
use pihome_core::sensors::{CameraSensor, GasSensor, MotionSensor, SensorWrapper, TempHumiditySensor};
use pihome_core::surface::{SdlSurface, Surface};
use pihome_core::{App, Config, SensorRegistry, StartupError};

const WINDOW_TITLE: &str = "piHome";

const GAS_SENSOR_NAME: &str = "Raspberry Pi MQ-135 Gas sensor";
const MOTION_SENSOR_NAME: &str = "Raspberry Pi PIR Motion decetor sensor";
const CAMERA_SENSOR_NAME: &str = "Raspberry Pi Camera sensor";
const TEMP_HUMIDITY_SENSOR_NAME: &str = "Raspberry Pi DHT11/DHT22 temperature/humidity";

fn main() -> ExitCode {
    // Before the logger, so RUST_LOG can come from .env.
    let dotenv = dotenvy::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Startup failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), StartupError> {
    let config = Config::load()?;
    info!("Configuration: {:?}", config);

    let gpio = Gpio::new().map_err(|e| StartupError::Gpio(e.to_string()))?;
    let registry = build_registry(&gpio, &config)?;
    info!("SENSORS: {:?}", registry.names());

    let size = display::window_size(&config.display)?;
    let mut surface = SdlSurface::new(WINDOW_TITLE, size, config.display.scale)?;
    info!(
        "Display {}x{}",
        surface.bounds().size.width,
        surface.bounds().size.height
    );

    let mut app = App::new(
        registry,
        &surface,
        &config.polling,
        Arc::new(LogDiagnostics),
    )?;
    app.run(&mut surface, &mut StdDelay);
    app.shutdown();

    info!("Bye");
    Ok(())
}

fn build_registry(gpio: &Gpio, config: &Config) -> Result<SensorRegistry<PiHardware>, StartupError> {
    let sensors = &config.sensors;
    let mut registry = SensorRegistry::new();

    if let Some(pin) = sensors.temp_humidity_pin {
        registry.register(SensorWrapper::TempHumidity(TempHumiditySensor::new(
            TEMP_HUMIDITY_SENSOR_NAME,
            GpioLine::new(gpio, pin)?,
            StdDelay,
            sensors.temp_humidity_max_timings,
        )));
    }

    registry.register(SensorWrapper::Gas(GasSensor::new(
        GAS_SENSOR_NAME,
        GpioInput::new(gpio, sensors.gas_pin)?,
        Polarity::from_active_low(sensors.gas_active_low),
    )));
    registry.register(SensorWrapper::Motion(MotionSensor::new(
        MOTION_SENSOR_NAME,
        GpioInput::new(gpio, sensors.motion_pin)?,
        Polarity::from_active_low(sensors.motion_active_low),
    )));

    if sensors.camera {
        registry.register(SensorWrapper::Camera(CameraSensor::new(
            CAMERA_SENSOR_NAME,
            RpicamCamera::new(config.camera.clone()),
        )));
    }

    Ok(registry)
}

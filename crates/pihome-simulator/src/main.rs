//! Desktop simulator for the piHome dashboard.
//!
//! Runs the real dashboard loop in an SDL2 window against simulated pins, a
//! scripted DHT bus and a test-pattern camera, so the UI can be exercised
//! without a Raspberry Pi.
//!
//! # Key bindings
//!
//! | Key    | Action                                 |
//! |--------|----------------------------------------|
//! | G      | Toggle the gas sensor output           |
//! | M      | Toggle the motion sensor output        |
//! | D      | Toggle a stuck DHT line (reads fail)   |
//! | C      | Toggle camera capture failures         |
//! | Q, Esc | Quit                                   |
//!
//! Mouse clicks are forwarded as touch events. Configuration is read the
//! same way as on the Pi (`PIHOME_*` variables); the window defaults to
//! 800x480.

use std::sync::Arc;
use std::time::{Duration, Instant};

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{error, info};

use pihome_core::diagnostics::LogDiagnostics;
use pihome_core::gpio::{Polarity, StdDelay};
use pihome_core::sensors::{
    CameraSensor, DhtReading, GasSensor, MotionSensor, SensorWrapper, TempHumiditySensor,
};
use pihome_core::sim::{NoopDelay, ScriptedDhtLine, SimCamera, SimHardware, SimInput};
use pihome_core::surface::{InputEvent, Key, SdlSurface, Surface};
use pihome_core::{App, Config, SensorRegistry, StartupError};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

const DEFAULT_WINDOW_SIZE: Size = Size::new(800, 480);

/// Interval between synthetic climate samples.
const MOCK_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// Mock data generation
// ---------------------------------------------------------------------------

/// Generates temperature/humidity readings that vary over time.
struct MockClimate {
    started: Instant,
}

impl MockClimate {
    fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    fn sample(&self) -> DhtReading {
        let t = self.started.elapsed().as_secs_f64();

        // Temperature: 20-26 C sinusoidal with slow drift
        let temperature = 23.0 + 3.0 * (t / 120.0).sin() + 0.5 * (t / 37.0).cos();

        // Humidity: 40-60 % with a different period
        let humidity = 50.0 + 10.0 * (t / 180.0).sin() + 2.0 * (t / 23.0).cos();

        DhtReading {
            temperature_c: temperature as f32,
            humidity_percent: humidity as f32,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulated hardware controls
// ---------------------------------------------------------------------------

/// The outside ends of the simulated devices.
struct Controls {
    gas: SimInput,
    motion: SimInput,
    dht: ScriptedDhtLine,
    dht_stuck: bool,
    camera: SimCamera,
    camera_failing: bool,
    climate: MockClimate,
    last_sample: Instant,
}

impl Controls {
    fn new(config: &Config) -> Self {
        let climate = MockClimate::new();
        let dht = ScriptedDhtLine::default();
        dht.set_reading(climate.sample());

        Self {
            // Outputs start at their inactive level.
            gas: SimInput::new(config.sensors.gas_active_low),
            motion: SimInput::new(config.sensors.motion_active_low),
            dht,
            dht_stuck: false,
            camera: SimCamera::new(config.camera.width, config.camera.height),
            camera_failing: false,
            climate,
            last_sample: Instant::now(),
        }
    }

    /// Apply a key press. Returns `false` for keys the simulator ignores.
    fn handle_key(&mut self, key: char) -> bool {
        match key {
            'g' => {
                let high = self.gas.toggle();
                info!("Gas output {}", if high { "high" } else { "low" });
            }
            'm' => {
                let high = self.motion.toggle();
                info!("Motion output {}", if high { "high" } else { "low" });
            }
            'd' => {
                self.dht_stuck = !self.dht_stuck;
                self.dht.set_stuck(self.dht_stuck);
                info!("DHT line stuck: {}", self.dht_stuck);
            }
            'c' => {
                self.camera_failing = !self.camera_failing;
                self.camera.set_failing(self.camera_failing);
                info!("Camera failing: {}", self.camera_failing);
            }
            _ => return false,
        }
        true
    }

    fn tick(&mut self) {
        if self.last_sample.elapsed() >= MOCK_SAMPLE_INTERVAL {
            self.dht.set_reading(self.climate.sample());
            self.last_sample = Instant::now();
        }
    }
}

/// SDL window that consumes the simulator's control keys.
struct SimulatorSurface {
    window: SdlSurface,
    controls: Controls,
}

impl Surface for SimulatorSurface {
    type Target = <SdlSurface as Surface>::Target;

    fn bounds(&self) -> Rectangle {
        self.window.bounds()
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.controls.tick();

        let mut events = self.window.poll_events();
        events.retain(|event| match event {
            InputEvent::KeyDown(Key::Char(key)) => !self.controls.handle_key(*key),
            _ => true,
        });
        for event in &mut events {
            if *event == InputEvent::KeyDown(Key::Char('q')) {
                *event = InputEvent::KeyDown(Key::Escape);
            }
        }
        events
    }

    fn target(&mut self) -> &mut Self::Target {
        self.window.target()
    }

    fn present(&mut self) {
        self.window.present();
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn build_registry(config: &Config, controls: &Controls) -> SensorRegistry<SimHardware> {
    let sensors = &config.sensors;
    let mut registry = SensorRegistry::new();

    registry.register(SensorWrapper::TempHumidity(TempHumiditySensor::new(
        "Simulated DHT22 temperature/humidity",
        controls.dht.clone(),
        NoopDelay,
        sensors.temp_humidity_max_timings,
    )));
    registry.register(SensorWrapper::Gas(GasSensor::new(
        "Simulated MQ-135 Gas sensor",
        controls.gas.clone(),
        Polarity::from_active_low(sensors.gas_active_low),
    )));
    registry.register(SensorWrapper::Motion(MotionSensor::new(
        "Simulated PIR Motion sensor",
        controls.motion.clone(),
        Polarity::from_active_low(sensors.motion_active_low),
    )));
    registry.register(SensorWrapper::Camera(CameraSensor::new(
        "Simulated Camera sensor",
        controls.camera.clone(),
    )));

    registry
}

fn run() -> Result<(), StartupError> {
    let config = Config::load()?;

    let size = match (config.display.width, config.display.height) {
        (Some(width), Some(height)) => Size::new(width, height),
        _ => DEFAULT_WINDOW_SIZE,
    };
    let scale = config.display.scale;

    info!("Starting piHome simulator");
    info!("Display: {}x{} (scale {}x)", size.width, size.height, scale);
    info!("Keys: G=Gas  M=Motion  D=DHT stuck  C=Camera fail  Q=Quit");

    let controls = Controls::new(&config);
    let registry = build_registry(&config, &controls);
    info!("SENSORS: {:?}", registry.names());

    let mut surface = SimulatorSurface {
        window: SdlSurface::new("piHome Simulator", size, scale)?,
        controls,
    };

    let mut app = App::new(
        registry,
        &surface,
        &config.polling,
        Arc::new(LogDiagnostics),
    )?;
    app.run(&mut surface, &mut StdDelay);
    app.shutdown();

    info!("Simulator exiting");
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run() {
        error!("Startup failed: {}", e);
        std::process::exit(1);
    }
}

use std::sync::Arc;
use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use pihome_core::config::PollingConfig;
use pihome_core::diagnostics::RecordingDiagnostics;
use pihome_core::gpio::Polarity;
use pihome_core::sensors::{CameraSensor, GasSensor, MotionSensor, Reading, SensorWrapper};
use pihome_core::sim::{NoopDelay, SimCamera, SimHardware, SimInput};
use pihome_core::surface::{HeadlessSurface, InputEvent, Surface};
use pihome_core::ui::TouchPoint;
use pihome_core::{App, RunState, SensorRegistry};

fn registry(gas: &SimInput, camera: &SimCamera) -> SensorRegistry<SimHardware> {
    let mut registry = SensorRegistry::new();
    registry.register(SensorWrapper::Gas(GasSensor::new(
        "gas",
        gas.clone(),
        Polarity::ActiveLow,
    )));
    registry.register(SensorWrapper::Motion(MotionSensor::new(
        "pir",
        SimInput::new(false),
        Polarity::ActiveHigh,
    )));
    registry.register(SensorWrapper::Camera(CameraSensor::new("cam", camera.clone())));
    registry
}

#[test]
fn window_close_stops_the_loop_for_good() {
    let gas = SimInput::new(true);
    let camera = SimCamera::new(8, 6);
    let mut surface = HeadlessSurface::new(Size::new(800, 480));
    surface.push_events(std::iter::empty());
    surface.push_events(std::iter::empty());
    surface.push_events([InputEvent::Quit]);

    let mut app = App::new(
        registry(&gas, &camera),
        &surface,
        &PollingConfig::default(),
        Arc::new(RecordingDiagnostics::new()),
    )
    .unwrap();

    app.run(&mut surface, &mut NoopDelay);
    assert!(!app.is_running());
    assert_eq!(surface.presented(), 2);

    // Further input cannot bring it back.
    app.handle_event(InputEvent::Press(TouchPoint::new(0, 0)));
    app.step(&mut surface, &mut NoopDelay);
    assert_eq!(app.state(), RunState::Exiting);
    assert_eq!(surface.presented(), 2);
    app.shutdown();
}

#[test]
fn exit_button_press_stops_the_loop() {
    let gas = SimInput::new(true);
    let camera = SimCamera::new(8, 6);
    let mut surface = HeadlessSurface::new(Size::new(800, 480));
    let mut app = App::new(
        registry(&gas, &camera),
        &surface,
        &PollingConfig::default(),
        Arc::new(RecordingDiagnostics::new()),
    )
    .unwrap();

    app.step(&mut surface, &mut NoopDelay);
    let exit = app.dashboard().layout().exit_button.center();
    surface.push_events([InputEvent::Press(exit.into())]);
    app.run(&mut surface, &mut NoopDelay);

    assert_eq!(app.state(), RunState::Exiting);
    assert_eq!(surface.presented(), 1);
}

#[test]
fn background_polling_feeds_the_dashboard() {
    let gas = SimInput::new(false);
    let camera = SimCamera::new(8, 6);
    let mut surface = HeadlessSurface::new(Size::new(800, 480));
    let polling = PollingConfig {
        interval_ms: 1,
        background: true,
    };
    let mut app = App::new(
        registry(&gas, &camera),
        &surface,
        &polling,
        Arc::new(RecordingDiagnostics::new()),
    )
    .unwrap();
    assert!(app.registry().is_none());

    let deadline = Instant::now() + Duration::from_secs(5);
    while !app.snapshots()[0].warning && Instant::now() < deadline {
        app.step(&mut surface, &mut NoopDelay);
        std::thread::sleep(Duration::from_millis(2));
    }
    assert!(app.snapshots()[0].warning);

    let button = app.dashboard().layout().panels[2]
        .picture_button
        .unwrap()
        .center();
    app.handle_event(InputEvent::Press(button.into()));

    let has_image = |app: &App<SimHardware>| match &app.snapshots()[2].reading {
        Reading::Camera(image) => !image.is_empty(),
        _ => false,
    };
    while !has_image(&app) && Instant::now() < deadline {
        app.step(&mut surface, &mut NoopDelay);
        std::thread::sleep(Duration::from_millis(2));
    }
    assert!(has_image(&app));
    assert_eq!(camera.captures(), 1);

    app.shutdown();
}

/// Draw target that rejects every operation.
struct BrokenDisplay;

#[derive(Debug)]
struct DisplayLost;

impl OriginDimensions for BrokenDisplay {
    fn size(&self) -> Size {
        Size::new(800, 480)
    }
}

impl DrawTarget for BrokenDisplay {
    type Color = Rgb565;
    type Error = DisplayLost;

    fn draw_iter<I>(&mut self, _pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        Err(DisplayLost)
    }
}

struct BrokenSurface {
    display: BrokenDisplay,
    presented: usize,
    polls: usize,
}

impl Surface for BrokenSurface {
    type Target = BrokenDisplay;

    fn bounds(&self) -> Rectangle {
        self.display.bounding_box()
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.polls += 1;
        if self.polls == 3 {
            vec![InputEvent::Quit]
        } else {
            Vec::new()
        }
    }

    fn target(&mut self) -> &mut BrokenDisplay {
        &mut self.display
    }

    fn present(&mut self) {
        self.presented += 1;
    }
}

#[test]
fn draw_errors_are_reported_and_the_loop_continues() {
    let diagnostics = RecordingDiagnostics::new();
    let mut surface = BrokenSurface {
        display: BrokenDisplay,
        presented: 0,
        polls: 0,
    };
    let mut app = App::new(
        registry(&SimInput::new(true), &SimCamera::new(8, 6)),
        &surface,
        &PollingConfig::default(),
        Arc::new(diagnostics.clone()),
    )
    .unwrap();

    app.run(&mut surface, &mut NoopDelay);

    let reports = diagnostics.reports();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|(source, message)| source == "display" && message == "DisplayLost"));
    assert_eq!(surface.presented, 2);
}

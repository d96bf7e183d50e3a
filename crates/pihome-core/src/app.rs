//! Application loop
//!
//! [`App`] alternates sensor updates and dashboard frames until the window is
//! closed or the Exit action fires:
//!
//! 1. update every sensor in registry order (or take the newest batch from
//!    the background poller)
//! 2. sleep the polling interval
//! 3. handle window and input events
//! 4. draw the dashboard
//! 5. present the frame

use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::config::PollingConfig;
use crate::dashboard::Dashboard;
use crate::diagnostics::Diagnostics;
use crate::error::StartupError;
use crate::poller::{Poller, PollerCommand};
use crate::registry::SensorRegistry;
use crate::sensors::{Hardware, SensorSnapshot};
use crate::surface::{InputEvent, Key, Surface};
use crate::ui::Action;

/// Lifecycle of the main loop. `Exiting` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Exiting,
}

/// Where sensor state comes from.
enum Source<H: Hardware> {
    /// Polled on the render thread, between frames.
    Inline(SensorRegistry<H>),
    /// Polled by a worker thread.
    Background(Poller),
}

pub struct App<H: Hardware> {
    source: Source<H>,
    snapshots: Vec<SensorSnapshot>,
    dashboard: Dashboard,
    state: RunState,
    interval_ms: u32,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<H: Hardware + 'static> App<H> {
    /// Take ownership of the registry and lay the dashboard out for `surface`.
    ///
    /// With `polling.background` set the registry moves to a worker thread.
    pub fn new<S: Surface>(
        registry: SensorRegistry<H>,
        surface: &S,
        polling: &PollingConfig,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Result<Self, StartupError> {
        let snapshots = registry.snapshots();
        let source = if polling.background {
            Source::Background(Poller::spawn(
                registry,
                Duration::from_millis(u64::from(polling.interval_ms)),
            )?)
        } else {
            Source::Inline(registry)
        };

        Ok(Self {
            source,
            snapshots,
            dashboard: Dashboard::new(surface.bounds()),
            state: RunState::Running,
            interval_ms: polling.interval_ms,
            diagnostics,
        })
    }
}

impl<H: Hardware> App<H> {
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Sensor state the next frame is drawn from, in registry order.
    pub fn snapshots(&self) -> &[SensorSnapshot] {
        &self.snapshots
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// The registry, unless it was moved to the background poller.
    pub fn registry(&self) -> Option<&SensorRegistry<H>> {
        match &self.source {
            Source::Inline(registry) => Some(registry),
            Source::Background(_) => None,
        }
    }

    /// Refresh sensor state, then wait out the polling interval.
    pub fn update(&mut self, delay: &mut impl DelayNs) {
        match &mut self.source {
            Source::Inline(registry) => {
                registry.update_all();
                self.snapshots = registry.snapshots();
            }
            Source::Background(poller) => {
                if let Some(batch) = poller.latest() {
                    self.snapshots = batch;
                }
            }
        }
        delay.delay_ms(self.interval_ms);
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Quit => {
                info!("Window closed");
                self.exit();
            }
            InputEvent::KeyDown(Key::Escape) => self.exit(),
            InputEvent::Press(point) => {
                if let Some(action) = self.dashboard.hit_test(point, &self.snapshots) {
                    self.apply(action);
                }
            }
            InputEvent::Release(_) | InputEvent::KeyDown(_) => {}
        }
    }

    pub fn apply(&mut self, action: Action) {
        debug!("Action: {:?}", action);
        match action {
            Action::Exit => self.exit(),
            Action::TakePicture(index) => match &mut self.source {
                Source::Inline(registry) => {
                    if registry.take_picture(index) {
                        self.snapshots = registry.snapshots();
                    }
                }
                Source::Background(poller) => {
                    poller.send(PollerCommand::TakePicture(index));
                }
            },
        }
    }

    fn exit(&mut self) {
        if self.state == RunState::Running {
            info!("Exit requested");
        }
        self.state = RunState::Exiting;
    }

    /// Draw one dashboard frame.
    pub fn draw<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = embedded_graphics::pixelcolor::Rgb565>,
    {
        self.dashboard
            .draw(display, &self.snapshots, Instant::now())
    }

    /// One loop iteration. Does nothing once exiting.
    pub fn step<S>(&mut self, surface: &mut S, delay: &mut impl DelayNs)
    where
        S: Surface,
        <S::Target as DrawTarget>::Error: Debug,
    {
        if !self.is_running() {
            return;
        }

        self.update(delay);
        for event in surface.poll_events() {
            self.handle_event(event);
        }
        if !self.is_running() {
            return;
        }

        if let Err(e) = self.draw(surface.target()) {
            self.diagnostics.report("display", &format!("{e:?}"));
        }
        surface.present();
    }

    /// Loop until exit is requested.
    pub fn run<S>(&mut self, surface: &mut S, delay: &mut impl DelayNs)
    where
        S: Surface,
        <S::Target as DrawTarget>::Error: Debug,
    {
        info!("Entering main loop");
        while self.is_running() {
            self.step(surface, delay);
        }
    }

    /// Stop background polling and release every sensor.
    pub fn shutdown(self) {
        let sensors = self.snapshots.len();
        match self.source {
            Source::Inline(registry) => drop(registry),
            Source::Background(mut poller) => poller.shutdown(),
        }
        info!("Released {} sensors", sensors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnostics;
    use crate::gpio::Polarity;
    use crate::sensors::{CameraSensor, GasSensor, SensorWrapper};
    use crate::sim::{NoopDelay, RecordingDelay, SimCamera, SimHardware, SimInput};
    use crate::surface::HeadlessSurface;
    use crate::ui::TouchPoint;

    fn registry(camera: &SimCamera) -> SensorRegistry<SimHardware> {
        let mut registry = SensorRegistry::new();
        registry.register(SensorWrapper::Gas(GasSensor::new(
            "gas",
            SimInput::new(true),
            Polarity::ActiveLow,
        )));
        registry.register(SensorWrapper::Camera(CameraSensor::new("cam", camera.clone())));
        registry
    }

    fn app(surface: &HeadlessSurface, camera: &SimCamera) -> App<SimHardware> {
        App::new(
            registry(camera),
            surface,
            &PollingConfig::default(),
            Arc::new(RecordingDiagnostics::new()),
        )
        .unwrap()
    }

    #[test]
    fn update_sleeps_the_polling_interval() {
        let surface = HeadlessSurface::new(Size::new(800, 480));
        let mut app = app(&surface, &SimCamera::new(4, 3));
        let mut delay = RecordingDelay::default();

        app.update(&mut delay);
        app.update(&mut delay);
        assert_eq!(delay.total_ms(), 200);
    }

    #[test]
    fn escape_key_exits() {
        let mut surface = HeadlessSurface::new(Size::new(800, 480));
        let mut app = app(&surface, &SimCamera::new(4, 3));
        surface.push_events([InputEvent::KeyDown(Key::Char('x'))]);
        surface.push_events([InputEvent::KeyDown(Key::Escape)]);

        app.step(&mut surface, &mut NoopDelay);
        assert!(app.is_running());
        app.step(&mut surface, &mut NoopDelay);
        assert_eq!(app.state(), RunState::Exiting);
        assert_eq!(surface.presented(), 1);
    }

    #[test]
    fn take_picture_button_captures_once() {
        let camera = SimCamera::new(4, 3);
        let mut surface = HeadlessSurface::new(Size::new(800, 480));
        let mut app = app(&surface, &camera);
        app.step(&mut surface, &mut NoopDelay);

        let button = app.dashboard().layout().panels[1]
            .picture_button
            .unwrap()
            .center();
        app.handle_event(InputEvent::Press(TouchPoint::from(button)));
        assert_eq!(camera.captures(), 1);

        // Updates alone never capture.
        app.step(&mut surface, &mut NoopDelay);
        assert_eq!(camera.captures(), 1);
    }

    #[test]
    fn exit_is_terminal() {
        let surface = HeadlessSurface::new(Size::new(800, 480));
        let mut app = app(&surface, &SimCamera::new(4, 3));
        app.apply(Action::Exit);
        app.handle_event(InputEvent::Press(TouchPoint::new(1, 1)));
        assert!(!app.is_running());
        app.shutdown();
    }
}

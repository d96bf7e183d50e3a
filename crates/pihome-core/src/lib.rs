//! Hardware-independent core library for piHome
//!
//! This crate contains everything of the piHome dashboard that does not touch
//! the Raspberry Pi directly: the sensor capability trait and the concrete
//! sensors (written against `embedded-hal` pins), the ordered sensor registry,
//! the dashboard renderer (an `embedded-graphics` draw pass), the application
//! loop state machine, the optional background poller, configuration and
//! error types.
//!
//! Hardware is injected through the [`sensors::Hardware`] bundle, so the same
//! code runs on the Pi (`pihome` binary), in the desktop simulator and in the
//! tests (see [`sim`]).

pub mod app;
pub mod camera;
pub mod config;
pub mod dashboard;
pub mod diagnostics;
pub mod error;
pub mod framebuffer;
pub mod gpio;
pub mod poller;
pub mod registry;
pub mod sensors;
pub mod sim;
pub mod surface;
pub mod ui;

pub use app::{App, RunState};
pub use config::Config;
pub use error::{CameraError, ConfigError, SensorError, StartupError};
pub use registry::SensorRegistry;

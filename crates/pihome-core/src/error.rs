//! Error types for piHome
//!
//! Only [`StartupError`] is fatal. Sensor and camera errors are produced at
//! the hardware boundary and swallowed by the sensor that owns the hardware,
//! so they never reach the application loop.

use thiserror::Error;

/// Fatal errors raised while bringing the system up, before the loop starts.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("GPIO initialisation failed: {0}")]
    Gpio(String),
    #[error("could not determine the display video mode: {0}")]
    DisplayUnavailable(String),
    #[error("could not create the window: {0}")]
    Window(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Transient, per-read sensor failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensorError {
    #[error("{sensor}: {operation} failed ({details})")]
    ReadFailed {
        sensor: &'static str,
        operation: &'static str,
        details: String,
    },
    #[error("{sensor}: timed out while waiting to {operation}")]
    Timeout {
        sensor: &'static str,
        operation: &'static str,
    },
    #[error("{sensor}: incomplete frame, got {bits} of 40 bits")]
    IncompleteFrame { sensor: &'static str, bits: usize },
    #[error("{sensor}: checksum mismatch (expected {expected:#04x}, got {actual:#04x})")]
    ChecksumMismatch {
        sensor: &'static str,
        expected: u8,
        actual: u8,
    },
}

/// Failures of a still capture.
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("failed to run capture program `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("capture program exited with {status}: {stderr}")]
    CaptureFailed { status: String, stderr: String },
    #[error("captured buffer has {actual} bytes, expected {expected} for {width}x{height} RGB")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("camera is not available: {0}")]
    Unavailable(String),
}

/// Configuration loading and validation failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("environment variable {name} has invalid value `{value}`")]
    InvalidEnv { name: &'static str, value: String },
    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

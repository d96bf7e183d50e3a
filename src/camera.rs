//! Still capture through `rpicam-still`
//!
//! The program writes one raw RGB888 frame to stdout. Rows may be padded to
//! the ISP's stride alignment, which [`CameraImage::from_padded_rgb`] strips.

use std::process::Command;

use log::debug;
use pihome_core::camera::{Camera, CameraImage};
use pihome_core::config::CameraConfig;
use pihome_core::error::CameraError;

pub struct RpicamCamera {
    config: CameraConfig,
}

impl RpicamCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }

    /// Command-line arguments for one capture.
    pub fn args(&self) -> Vec<String> {
        vec![
            "-n".into(),
            "-t".into(),
            self.config.timeout_ms.to_string(),
            "--width".into(),
            self.config.width.to_string(),
            "--height".into(),
            self.config.height.to_string(),
            "-e".into(),
            "rgb".into(),
            "-o".into(),
            "-".into(),
        ]
    }
}

impl Camera for RpicamCamera {
    fn capture(&mut self) -> Result<CameraImage, CameraError> {
        let program = &self.config.program;
        debug!("Running {} {}", program, self.args().join(" "));

        let output = Command::new(program)
            .args(self.args())
            .output()
            .map_err(|source| CameraError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CameraError::CaptureFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        CameraImage::from_padded_rgb(self.config.width, self.config.height, &output.stdout)
    }
}

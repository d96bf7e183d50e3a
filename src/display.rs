//! Native video mode of the Pi's display

use std::fs;

use embedded_graphics::prelude::Size;
use pihome_core::config::DisplayConfig;
use pihome_core::error::StartupError;

pub const FB0_VIRTUAL_SIZE: &str = "/sys/class/graphics/fb0/virtual_size";

/// Parse the `"<width>,<height>"` contents of a framebuffer `virtual_size`.
pub fn parse_virtual_size(content: &str) -> Option<Size> {
    let (width, height) = content.trim().split_once(',')?;
    let width = width.trim().parse().ok()?;
    let height = height.trim().parse().ok()?;
    (width > 0 && height > 0).then(|| Size::new(width, height))
}

/// Size of the first framebuffer.
pub fn native_size() -> Result<Size, StartupError> {
    let content = fs::read_to_string(FB0_VIRTUAL_SIZE)
        .map_err(|e| StartupError::DisplayUnavailable(format!("{FB0_VIRTUAL_SIZE}: {e}")))?;
    parse_virtual_size(&content).ok_or_else(|| {
        StartupError::DisplayUnavailable(format!(
            "{FB0_VIRTUAL_SIZE}: unexpected contents `{}`",
            content.trim()
        ))
    })
}

/// The configured window size, or the native mode when none is configured.
pub fn window_size(config: &DisplayConfig) -> Result<Size, StartupError> {
    match (config.width, config.height) {
        (Some(width), Some(height)) => Ok(Size::new(width, height)),
        _ => native_size(),
    }
}

//! Styling for the dashboard widgets
//!
//! - [`colors`] - color constants and the dashboard palette
//! - [`layout`] - padding
//! - [`style`] - per-element style and button variants

pub mod colors;
pub mod layout;
pub mod style;

pub use colors::ColorPalette;
pub use layout::Padding;
pub use style::{ButtonVariant, Style};

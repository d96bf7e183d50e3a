//! Small retained-mode widget set used by the dashboard
//!
//! - [`core`]: touch points, actions and the drawable/touchable traits
//! - [`components`]: buttons and text labels
//! - [`styling`]: colors, palette, padding and per-element styles

pub mod components;
pub mod core;
pub mod styling;

pub use components::{Button, TextComponent, TextSize};
pub use self::core::{Action, Drawable, TouchEvent, TouchPoint, TouchResult, Touchable};
pub use styling::{ButtonVariant, ColorPalette, Padding, Style};

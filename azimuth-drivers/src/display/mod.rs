//! Display hardware
//!
//! - [`St7789`]: SPI TFT panel driver usable as an `embedded-graphics` target
//! - [`activate_backlight`]: turn the backlight on through the panel's own
//!   control line, or a fallback GPIO when the panel has none

mod backlight;
mod st7789;

pub use backlight::{activate_backlight, Backlight, BacklightError, BacklightPath, GpioBacklight};
pub use st7789::{Orientation, PanelConfig, St7789, St7789Error};

//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in azimuth-core and azimuth-hal for the bearing display hardware:
//!
//! - UART line source (node byte stream → protocol lines)
//! - ST7789 TFT panel driver (SPI, RGB565, `embedded-graphics` target)
//! - Backlight activation with a fallback GPIO

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod serial;

pub use display::{activate_backlight, Backlight, BacklightError, BacklightPath, GpioBacklight, St7789, St7789Error};
pub use serial::UartLineSource;

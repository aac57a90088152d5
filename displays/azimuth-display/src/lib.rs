//! Canvas abstraction and bearing renderer for Azimuth
//!
//! This crate provides:
//! - `Canvas` trait for anything that can clear, draw lines and polygons
//! - `Palette` of the six colors the bearing display uses
//! - Arrow geometry and direction-coded color mapping
//! - `TickRing` of static reference marks every 30°
//! - `Renderer`, which repaints only when the selected bearing changes
//! - `GraphicsCanvas`, adapting any `embedded-graphics` RGB565 target
//!
//! # Screen frame
//!
//! Bearings are degrees clockwise from "up". A bearing `b` points along
//! `(sin b, -cos b)` in screen coordinates (y grows downwards).

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod geometry;
pub mod graphics;
pub mod renderer;
pub mod ticks;

// Re-export key types
pub use backend::{Canvas, DisplayError, Palette, PolygonStyle};
pub use embedded_graphics::prelude::Point;
pub use geometry::{arrow_color, arrow_geometry, Arrow};
pub use graphics::GraphicsCanvas;
pub use renderer::{RedrawOutcome, Renderer};
pub use ticks::{Tick, TickRing, TICK_COUNT};

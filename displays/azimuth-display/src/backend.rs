//! Canvas trait
//!
//! Defines the drawing surface the renderer paints on.

use embedded_graphics::prelude::Point;

/// Canvas errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with the panel
    Communication,
    /// Polygon needs at least three vertices
    InvalidPolygon,
    /// Panel not initialized
    NotInitialized,
}

/// Colors used by the bearing display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Palette {
    /// Screen background (black)
    Background,
    Red,
    Green,
    Blue,
    Yellow,
    /// Anything without a cardinal meaning (white)
    Neutral,
}

/// Polygon fill mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PolygonStyle {
    /// Closed outline only
    #[default]
    Outline,
    /// Solid fill
    Filled,
}

/// Canvas trait
///
/// Provides a hardware-agnostic pixel surface. Coordinates may fall outside
/// the canvas; implementations clip.
pub trait Canvas {
    /// Pixel dimensions as (width, height)
    fn size(&self) -> (u16, u16);

    /// Fill the whole canvas with one color
    fn clear(&mut self, color: Palette) -> Result<(), DisplayError>;

    /// Draw a one pixel wide line between two points (inclusive)
    fn draw_line(&mut self, start: Point, end: Point, color: Palette) -> Result<(), DisplayError>;

    /// Draw a closed polygon
    ///
    /// `vertices` must hold at least three points; the last vertex is joined
    /// back to the first.
    fn draw_polygon(
        &mut self,
        vertices: &[Point],
        color: Palette,
        style: PolygonStyle,
    ) -> Result<(), DisplayError>;
}

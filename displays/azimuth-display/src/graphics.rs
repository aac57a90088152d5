//! `embedded-graphics` adapter
//!
//! Lets any RGB565 `DrawTarget` (a panel driver, a simulator, a mock
//! display) act as a [`Canvas`].

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Triangle};

use crate::backend::{Canvas, DisplayError, Palette, PolygonStyle};

/// Stroke width for lines and outlines
const STROKE_WIDTH: u32 = 1;

impl Palette {
    /// RGB565 value for this palette entry
    pub const fn to_rgb565(self) -> Rgb565 {
        match self {
            Palette::Background => Rgb565::BLACK,
            Palette::Red => Rgb565::RED,
            Palette::Green => Rgb565::GREEN,
            Palette::Blue => Rgb565::BLUE,
            Palette::Yellow => Rgb565::YELLOW,
            Palette::Neutral => Rgb565::WHITE,
        }
    }
}

/// Canvas over an `embedded-graphics` draw target
pub struct GraphicsCanvas<D> {
    target: D,
}

impl<D> GraphicsCanvas<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    /// Wrap a draw target
    pub fn new(target: D) -> Self {
        Self { target }
    }

    /// Borrow the wrapped target
    pub fn target(&self) -> &D {
        &self.target
    }
}

impl<D> Canvas for GraphicsCanvas<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    fn size(&self) -> (u16, u16) {
        let size = self.target.size();
        (
            size.width.min(u32::from(u16::MAX)) as u16,
            size.height.min(u32::from(u16::MAX)) as u16,
        )
    }

    fn clear(&mut self, color: Palette) -> Result<(), DisplayError> {
        self.target
            .clear(color.to_rgb565())
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_line(&mut self, start: Point, end: Point, color: Palette) -> Result<(), DisplayError> {
        Line::new(start, end)
            .into_styled(PrimitiveStyle::with_stroke(color.to_rgb565(), STROKE_WIDTH))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_polygon(
        &mut self,
        vertices: &[Point],
        color: Palette,
        style: PolygonStyle,
    ) -> Result<(), DisplayError> {
        if vertices.len() < 3 {
            return Err(DisplayError::InvalidPolygon);
        }

        match style {
            PolygonStyle::Outline => {
                for (i, &start) in vertices.iter().enumerate() {
                    let end = vertices[(i + 1) % vertices.len()];
                    self.draw_line(start, end, color)?;
                }
                Ok(())
            }
            PolygonStyle::Filled => {
                // Triangle fan from the first vertex; arrowheads are convex
                let fill = PrimitiveStyle::with_fill(color.to_rgb565());
                for pair in vertices[1..].windows(2) {
                    Triangle::new(vertices[0], pair[0], pair[1])
                        .into_styled(fill)
                        .draw(&mut self.target)
                        .map_err(|_| DisplayError::Communication)?;
                }
                Ok(())
            }
        }
    }
}

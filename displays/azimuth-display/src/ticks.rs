//! Tick ring
//!
//! Static reference marks every 30° around the canvas edge. The ring is
//! pure geometry: it is computed once for a canvas size and redrawn as-is
//! on every repaint.

use embedded_graphics::prelude::Point;

use crate::backend::{Canvas, DisplayError, Palette};
use crate::geometry::{center, direction};

/// Angle between neighbouring ticks (degrees)
pub const TICK_STEP_DEG: u16 = 30;

/// Number of ticks in the ring
pub const TICK_COUNT: usize = (360 / TICK_STEP_DEG) as usize;

/// Tick length (pixels)
pub const TICK_LEN: f32 = 8.0;

/// Ray marching step (pixels)
const RAY_STEP: f32 = 0.5;

/// Ray marching start radius (pixels)
const RAY_START: f32 = 1.0;

/// One reference tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick {
    /// Direction of the tick (degrees, multiple of 30)
    pub angle_deg: u16,
    /// Inner end of the tick
    pub start: Point,
    /// Outer end of the tick, on the canvas boundary
    pub end: Point,
    /// Red for the 0° reference, neutral otherwise
    pub color: Palette,
}

impl Tick {
    /// Cast a ray from the canvas center until it touches the inner rectangle
    fn cast(angle_deg: u16, width: u16, height: u16) -> Self {
        let (sin, cos) = direction(f32::from(angle_deg));
        let c = center(width, height);
        let (cx, cy) = (c.x as f32, c.y as f32);
        let (max_x, max_y) = (i32::from(width) - 1, i32::from(height) - 1);
        // The boundary is always reached well before this radius
        let max_r = f32::from(width) + f32::from(height);

        let mut r = RAY_START;
        let mut end = c;
        while r <= max_r {
            end = Point::new((cx + r * sin) as i32, (cy - r * cos) as i32);
            if end.x <= 0 || end.x >= max_x || end.y <= 0 || end.y >= max_y {
                break;
            }
            r += RAY_STEP;
        }

        let start = Point::new(
            (end.x as f32 - TICK_LEN * sin) as i32,
            (end.y as f32 + TICK_LEN * cos) as i32,
        );

        Self {
            angle_deg,
            start,
            end,
            color: if angle_deg == 0 {
                Palette::Red
            } else {
                Palette::Neutral
            },
        }
    }
}

/// The full ring of reference ticks for one canvas size
#[derive(Debug, Clone)]
pub struct TickRing {
    ticks: [Tick; TICK_COUNT],
}

impl TickRing {
    /// Compute the ring for a `width` x `height` canvas
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            ticks: core::array::from_fn(|i| Tick::cast(i as u16 * TICK_STEP_DEG, width, height)),
        }
    }

    /// All ticks, starting at 0° and going clockwise
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    /// Draw every tick
    pub fn draw<C: Canvas>(&self, canvas: &mut C) -> Result<(), DisplayError> {
        for tick in &self.ticks {
            canvas.draw_line(tick.start, tick.end, tick.color)?;
        }
        Ok(())
    }
}

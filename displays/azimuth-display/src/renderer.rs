//! Redraw-on-change rendering
//!
//! The panel is slow to repaint over SPI, and a node streaming the same
//! reading would otherwise cause a full-screen flash every poll cycle. The
//! renderer remembers the last bearing it actually painted and only repaints
//! when the selection moves.

use crate::backend::{Canvas, DisplayError, Palette, PolygonStyle};
use crate::geometry::{arrow_color, arrow_geometry};
use crate::ticks::TickRing;

/// What a call to [`Renderer::update`] did
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RedrawOutcome {
    /// Nothing selected yet, screen left alone
    NoSelection,
    /// Selection equals the bearing already on screen
    Unchanged,
    /// Full repaint for a new bearing
    Repainted { bearing: f32, color: Palette },
}

/// Bearing display renderer
pub struct Renderer {
    width: u16,
    height: u16,
    ticks: TickRing,
    head_style: PolygonStyle,
    /// Bearing painted by the last successful repaint
    last_drawn: Option<f32>,
}

impl Renderer {
    /// Create a renderer for a `width` x `height` canvas
    pub fn new(width: u16, height: u16, head_style: PolygonStyle) -> Self {
        Self {
            width,
            height,
            ticks: TickRing::new(width, height),
            head_style,
            last_drawn: None,
        }
    }

    /// Create a renderer sized to an existing canvas
    pub fn for_canvas<C: Canvas>(canvas: &C, head_style: PolygonStyle) -> Self {
        let (width, height) = canvas.size();
        Self::new(width, height, head_style)
    }

    /// Bearing currently on screen, if any
    pub fn last_drawn(&self) -> Option<f32> {
        self.last_drawn
    }

    /// The precomputed tick ring
    pub fn ticks(&self) -> &TickRing {
        &self.ticks
    }

    /// Paint the boot screen: background and tick ring, no arrow
    pub fn draw_startup<C: Canvas>(&self, canvas: &mut C) -> Result<(), DisplayError> {
        canvas.clear(Palette::Background)?;
        self.ticks.draw(canvas)
    }

    /// Repaint if `selection` differs from the bearing on screen
    ///
    /// A failed repaint leaves the remembered bearing unchanged so the next
    /// call tries again.
    pub fn update<C: Canvas>(
        &mut self,
        selection: Option<f32>,
        canvas: &mut C,
    ) -> Result<RedrawOutcome, DisplayError> {
        let Some(bearing) = selection else {
            return Ok(RedrawOutcome::NoSelection);
        };
        if self.last_drawn == Some(bearing) {
            return Ok(RedrawOutcome::Unchanged);
        }

        let color = self.repaint(bearing, canvas)?;
        self.last_drawn = Some(bearing);
        Ok(RedrawOutcome::Repainted { bearing, color })
    }

    fn repaint<C: Canvas>(&self, bearing: f32, canvas: &mut C) -> Result<Palette, DisplayError> {
        let arrow = arrow_geometry(bearing, self.width, self.height);
        let color = arrow_color(bearing);

        canvas.clear(Palette::Background)?;
        self.ticks.draw(canvas)?;
        canvas.draw_line(arrow.tail, arrow.shaft_end, color)?;
        canvas.draw_polygon(&arrow.head(), color, self.head_style)?;
        Ok(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticks::TICK_COUNT;
    use embedded_graphics::prelude::Point;
    use std::vec::Vec;

    /// Canvas operation recorded by [`RecordingCanvas`]
    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        Clear(Palette),
        Line(Point, Point, Palette),
        Polygon(Vec<Point>, Palette, PolygonStyle),
    }

    /// Mock canvas that records every call
    pub struct RecordingCanvas {
        pub width: u16,
        pub height: u16,
        pub ops: Vec<Op>,
        pub fail: bool,
    }

    impl RecordingCanvas {
        pub fn new(width: u16, height: u16) -> Self {
            Self {
                width,
                height,
                ops: Vec::new(),
                fail: false,
            }
        }

        pub fn clears(&self) -> usize {
            self.ops.iter().filter(|op| matches!(op, Op::Clear(_))).count()
        }
    }

    impl Canvas for RecordingCanvas {
        fn size(&self) -> (u16, u16) {
            (self.width, self.height)
        }

        fn clear(&mut self, color: Palette) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Communication);
            }
            self.ops.push(Op::Clear(color));
            Ok(())
        }

        fn draw_line(&mut self, start: Point, end: Point, color: Palette) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Communication);
            }
            self.ops.push(Op::Line(start, end, color));
            Ok(())
        }

        fn draw_polygon(
            &mut self,
            vertices: &[Point],
            color: Palette,
            style: PolygonStyle,
        ) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Communication);
            }
            self.ops.push(Op::Polygon(vertices.to_vec(), color, style));
            Ok(())
        }
    }

    #[test]
    fn test_no_selection_draws_nothing() {
        let mut canvas = RecordingCanvas::new(240, 135);
        let mut renderer = Renderer::for_canvas(&canvas, PolygonStyle::Outline);

        assert_eq!(renderer.update(None, &mut canvas), Ok(RedrawOutcome::NoSelection));
        assert!(canvas.ops.is_empty());
        assert_eq!(renderer.last_drawn(), None);
    }

    #[test]
    fn test_repaint_sequence() {
        let mut canvas = RecordingCanvas::new(240, 135);
        let mut renderer = Renderer::for_canvas(&canvas, PolygonStyle::Outline);

        let outcome = renderer.update(Some(92.0), &mut canvas).unwrap();
        assert_eq!(
            outcome,
            RedrawOutcome::Repainted {
                bearing: 92.0,
                color: Palette::Green
            }
        );

        // clear, 12 ticks, shaft, head
        assert_eq!(canvas.ops.len(), 1 + TICK_COUNT + 2);
        assert_eq!(canvas.ops[0], Op::Clear(Palette::Background));
        assert!(matches!(canvas.ops[1], Op::Line(_, _, Palette::Red)));
        let arrow = arrow_geometry(92.0, 240, 135);
        assert_eq!(
            canvas.ops[1 + TICK_COUNT],
            Op::Line(arrow.tail, arrow.shaft_end, Palette::Green)
        );
        assert_eq!(
            canvas.ops[2 + TICK_COUNT],
            Op::Polygon(arrow.head().to_vec(), Palette::Green, PolygonStyle::Outline)
        );
        assert_eq!(renderer.last_drawn(), Some(92.0));
    }

    #[test]
    fn test_same_bearing_repaints_once() {
        let mut canvas = RecordingCanvas::new(240, 135);
        let mut renderer = Renderer::for_canvas(&canvas, PolygonStyle::Filled);

        let mut repaints = 0;
        for _ in 0..10 {
            if let RedrawOutcome::Repainted { .. } = renderer.update(Some(100.0), &mut canvas).unwrap() {
                repaints += 1;
            }
        }
        assert_eq!(repaints, 1);
        assert_eq!(canvas.clears(), 1);
    }

    #[test]
    fn test_changed_bearing_repaints_again() {
        let mut canvas = RecordingCanvas::new(240, 135);
        let mut renderer = Renderer::for_canvas(&canvas, PolygonStyle::Outline);

        renderer.update(Some(100.0), &mut canvas).unwrap();
        renderer.update(Some(100.0), &mut canvas).unwrap();
        renderer.update(Some(250.0), &mut canvas).unwrap();
        renderer.update(Some(100.0), &mut canvas).unwrap();
        assert_eq!(canvas.clears(), 3);
    }

    #[test]
    fn test_none_keeps_previous_arrow() {
        let mut canvas = RecordingCanvas::new(240, 135);
        let mut renderer = Renderer::for_canvas(&canvas, PolygonStyle::Outline);

        renderer.update(Some(10.0), &mut canvas).unwrap();
        assert_eq!(renderer.update(None, &mut canvas), Ok(RedrawOutcome::NoSelection));
        assert_eq!(renderer.last_drawn(), Some(10.0));
        assert_eq!(canvas.clears(), 1);
    }

    #[test]
    fn test_failed_repaint_is_retried() {
        let mut canvas = RecordingCanvas::new(240, 135);
        let mut renderer = Renderer::for_canvas(&canvas, PolygonStyle::Outline);

        canvas.fail = true;
        assert_eq!(
            renderer.update(Some(45.0), &mut canvas),
            Err(DisplayError::Communication)
        );
        assert_eq!(renderer.last_drawn(), None);

        canvas.fail = false;
        assert!(matches!(
            renderer.update(Some(45.0), &mut canvas),
            Ok(RedrawOutcome::Repainted { .. })
        ));
    }

    #[test]
    fn test_startup_draws_ticks_only() {
        let mut canvas = RecordingCanvas::new(240, 135);
        let renderer = Renderer::for_canvas(&canvas, PolygonStyle::Outline);

        renderer.draw_startup(&mut canvas).unwrap();
        assert_eq!(canvas.ops.len(), 1 + TICK_COUNT);
        assert!(!canvas.ops.iter().any(|op| matches!(op, Op::Polygon(..))));
        assert_eq!(renderer.last_drawn(), None);
    }
}

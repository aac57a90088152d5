//! Arrow geometry and color mapping
//!
//! All pixel coordinates are truncated toward zero per component, so the
//! same bearing always lands on the same pixels.

use core::f32::consts::PI;

use embedded_graphics::prelude::Point;

use crate::backend::Palette;

/// Gap between the arrow tip and the nearest canvas edge (pixels)
pub const EDGE_MARGIN: i32 = 10;

/// Arrowhead length along the shaft (pixels)
pub const HEAD_LEN: i32 = 15;

/// Arrowhead half-width, perpendicular to the shaft (pixels)
pub const HEAD_HALF_WIDTH: i32 = 12;

/// Half-width of the color window around each cardinal bearing (degrees)
pub const COLOR_WINDOW_DEG: f32 = 5.0;

/// Screen-space direction of a bearing as `(sin b, cos b)`
///
/// Moving `r` pixels along bearing `b` from `(x, y)` lands on
/// `(x + r·sin b, y - r·cos b)`.
pub fn direction(bearing_deg: f32) -> (f32, f32) {
    let rad = bearing_deg * (PI / 180.0);
    (libm::sinf(rad), libm::cosf(rad))
}

/// Canvas center (integer division)
pub fn center(width: u16, height: u16) -> Point {
    Point::new(i32::from(width / 2), i32::from(height / 2))
}

/// Distance from the center to the arrow tip
pub fn shaft_length(width: u16, height: u16) -> i32 {
    i32::from(width.min(height) / 2) - EDGE_MARGIN
}

/// Pixel coordinates of a bearing arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Arrow {
    /// Shaft start (canvas center)
    pub tail: Point,
    /// Shaft end, where the arrowhead base sits
    pub shaft_end: Point,
    /// Arrowhead apex
    pub tip: Point,
    /// Base vertex on the clockwise side
    pub left: Point,
    /// Base vertex on the counter-clockwise side
    pub right: Point,
}

impl Arrow {
    /// Arrowhead triangle as (tip, left, right)
    pub fn head(&self) -> [Point; 3] {
        [self.tip, self.left, self.right]
    }
}

/// Compute the arrow for a bearing on a `width` x `height` canvas
pub fn arrow_geometry(bearing_deg: f32, width: u16, height: u16) -> Arrow {
    let (sin, cos) = direction(bearing_deg);
    let tail = center(width, height);
    let shaft_len = shaft_length(width, height);

    let along = |len: i32| {
        Point::new(
            tail.x + (len as f32 * sin) as i32,
            tail.y - (len as f32 * cos) as i32,
        )
    };
    let shaft_end = along(shaft_len - HEAD_LEN);
    let tip = along(shaft_len);

    let offset_x = (HEAD_HALF_WIDTH as f32 * cos) as i32;
    let offset_y = (HEAD_HALF_WIDTH as f32 * sin) as i32;

    Arrow {
        tail,
        shaft_end,
        tip,
        left: Point::new(shaft_end.x + offset_x, shaft_end.y + offset_y),
        right: Point::new(shaft_end.x - offset_x, shaft_end.y - offset_y),
    }
}

/// Direction-coded arrow color
///
/// Bearings strictly within ±5° of a cardinal direction get its color:
/// north red, east green, south blue, west yellow. Everything else is
/// neutral.
pub fn arrow_color(bearing_deg: f32) -> Palette {
    let mut angle = bearing_deg % 360.0;
    if angle < 0.0 {
        angle += 360.0;
    }
    let near = |target: f32| libm::fabsf(angle - target) < COLOR_WINDOW_DEG;

    if near(0.0) || near(360.0) {
        Palette::Red
    } else if near(90.0) {
        Palette::Green
    } else if near(180.0) {
        Palette::Blue
    } else if near(270.0) {
        Palette::Yellow
    } else {
        Palette::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: u16 = 240;
    const H: u16 = 135;

    #[test]
    fn test_color_windows() {
        assert_eq!(arrow_color(2.0), Palette::Red);
        assert_eq!(arrow_color(358.0), Palette::Red);
        assert_eq!(arrow_color(88.0), Palette::Green);
        assert_eq!(arrow_color(183.0), Palette::Blue);
        assert_eq!(arrow_color(269.0), Palette::Yellow);
        assert_eq!(arrow_color(45.0), Palette::Neutral);
    }

    #[test]
    fn test_color_window_edges_are_exclusive() {
        assert_eq!(arrow_color(5.0), Palette::Neutral);
        assert_eq!(arrow_color(355.0), Palette::Neutral);
        assert_eq!(arrow_color(4.9), Palette::Red);
        assert_eq!(arrow_color(95.0), Palette::Neutral);
        assert_eq!(arrow_color(265.1), Palette::Yellow);
    }

    #[test]
    fn test_color_wraps_out_of_range_bearings() {
        assert_eq!(arrow_color(360.0), Palette::Red);
        assert_eq!(arrow_color(450.0), Palette::Green);
        assert_eq!(arrow_color(-90.0), Palette::Yellow);
        assert_eq!(arrow_color(-1.0), Palette::Red);
    }

    #[test]
    fn test_shaft_length() {
        assert_eq!(shaft_length(W, H), 57);
        assert_eq!(shaft_length(240, 240), 110);
    }

    #[test]
    fn test_arrow_north() {
        let arrow = arrow_geometry(0.0, W, H);
        let c = center(W, H);
        let len = shaft_length(W, H);

        assert_eq!(arrow.tail, c);
        assert_eq!(arrow.tip, Point::new(c.x, c.y - len));
        assert_eq!(arrow.shaft_end, Point::new(c.x, c.y - (len - HEAD_LEN)));
        // Base vertices spread horizontally
        assert_eq!(arrow.left, Point::new(arrow.shaft_end.x + HEAD_HALF_WIDTH, arrow.shaft_end.y));
        assert_eq!(arrow.right, Point::new(arrow.shaft_end.x - HEAD_HALF_WIDTH, arrow.shaft_end.y));
    }

    #[test]
    fn test_arrow_east() {
        let arrow = arrow_geometry(90.0, W, H);
        let c = center(W, H);
        let len = shaft_length(W, H);

        assert!((arrow.tip.x - (c.x + len)).abs() <= 1);
        assert!((arrow.tip.y - c.y).abs() <= 1);
        // Base vertices spread vertically
        assert!((arrow.left.x - arrow.shaft_end.x).abs() <= 1);
        assert!((arrow.left.y - (arrow.shaft_end.y + HEAD_HALF_WIDTH)).abs() <= 1);
    }

    #[test]
    fn test_arrow_south_and_west() {
        let c = center(W, H);
        let len = shaft_length(W, H);

        let south = arrow_geometry(180.0, W, H);
        assert!((south.tip.x - c.x).abs() <= 1);
        assert!((south.tip.y - (c.y + len)).abs() <= 1);

        let west = arrow_geometry(270.0, W, H);
        assert!((west.tip.x - (c.x - len)).abs() <= 1);
        assert!((west.tip.y - c.y).abs() <= 1);
    }

    #[test]
    fn test_head_is_symmetric_about_shaft() {
        let arrow = arrow_geometry(37.0, W, H);
        let mid_x = arrow.left.x + arrow.right.x;
        let mid_y = arrow.left.y + arrow.right.y;
        assert_eq!(mid_x, 2 * arrow.shaft_end.x);
        assert_eq!(mid_y, 2 * arrow.shaft_end.y);
        assert_eq!(arrow.head()[0], arrow.tip);
    }
}

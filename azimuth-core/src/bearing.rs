//! Bearing normalization
//!
//! Every node reports angles inside its own 180° field of view. Adding the
//! node's fixed heading offset rotates that field into the shared compass
//! frame, so readings from different nodes become comparable.

/// Degrees in a full turn
pub const FULL_TURN_DEG: f32 = 360.0;

/// Reduce an angle into `[0, 360)`
///
/// Negative angles wrap around. A result that rounds up to exactly 360
/// (tiny negative inputs) maps to 0.
pub fn wrap_degrees(deg: f32) -> f32 {
    let mut wrapped = deg % FULL_TURN_DEG;
    if wrapped < 0.0 {
        wrapped += FULL_TURN_DEG;
    }
    if wrapped >= FULL_TURN_DEG || wrapped == 0.0 {
        0.0
    } else {
        wrapped
    }
}

/// Map a node-local angle into the global frame
pub fn normalize(offset_deg: f32, local_angle_deg: f32) -> f32 {
    wrap_degrees(offset_deg + local_angle_deg)
}

/// One observation in the global frame
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    bearing_deg: f32,
    amplitude_db: f32,
}

impl Reading {
    /// Build a reading, wrapping the bearing into `[0, 360)`
    ///
    /// Returns `None` if either value is NaN or infinite.
    pub fn new(bearing_deg: f32, amplitude_db: f32) -> Option<Self> {
        if !bearing_deg.is_finite() || !amplitude_db.is_finite() {
            return None;
        }
        Some(Self {
            bearing_deg: wrap_degrees(bearing_deg),
            amplitude_db,
        })
    }

    /// Build a reading from a node-local angle and the node's offset
    pub fn from_local(offset_deg: f32, local_angle_deg: f32, amplitude_db: f32) -> Option<Self> {
        let sum = offset_deg + local_angle_deg;
        if !sum.is_finite() {
            return None;
        }
        Self::new(normalize(offset_deg, local_angle_deg), amplitude_db)
    }

    /// Global bearing in `[0, 360)`
    pub fn bearing_deg(&self) -> f32 {
        self.bearing_deg
    }

    /// Signal amplitude (dB)
    pub fn amplitude_db(&self) -> f32 {
        self.amplitude_db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_examples() {
        assert_eq!(normalize(90.0, 10.0), 100.0);
        assert_eq!(normalize(270.0, 100.0), 10.0);
        assert_eq!(normalize(270.0, 90.0), 0.0);
        assert_eq!(normalize(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_wrap_negative() {
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(-360.0), 0.0);
        assert_eq!(wrap_degrees(-720.5), 359.5);
    }

    #[test]
    fn test_wrap_never_returns_full_turn() {
        let tiny = -1.0e-6_f32;
        let wrapped = wrap_degrees(tiny);
        assert!(wrapped < FULL_TURN_DEG);
        assert!(wrapped >= 0.0);
    }

    #[test]
    fn test_wrap_negative_zero() {
        assert!(wrap_degrees(-0.0).is_sign_positive());
    }

    #[test]
    fn test_reading_rejects_non_finite() {
        assert!(Reading::new(f32::NAN, 1.0).is_none());
        assert!(Reading::new(1.0, f32::INFINITY).is_none());
        assert!(Reading::from_local(f32::MAX, f32::MAX, 1.0).is_none());
    }

    #[test]
    fn test_reading_from_local() {
        let reading = Reading::from_local(90.0, 10.0, 30.0).unwrap();
        assert_eq!(reading.bearing_deg(), 100.0);
        assert_eq!(reading.amplitude_db(), 30.0);
    }

    /// Shortest distance between two angles on the circle
    fn circular_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    proptest! {
        #[test]
        fn prop_normalize_in_range(offset in 0.0f32..360.0, angle in -1.0e4f32..1.0e4) {
            let bearing = normalize(offset, angle);
            prop_assert!((0.0..360.0).contains(&bearing));
        }

        #[test]
        fn prop_normalize_matches_modulo(offset in 0.0f32..360.0, angle in -1.0e4f32..1.0e4) {
            let bearing = normalize(offset, angle) as f64;
            let expected = (offset as f64 + angle as f64).rem_euclid(360.0);
            prop_assert!(circular_distance(bearing, expected) < 1.0e-2);
        }
    }
}

//! Wheel geometry: where the two dials sit and how big their markers are.

use super::constants::*;

/// Placement and marker sizes for both wheels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    /// Horizontal distance of each wheel centre from the canvas centre
    pub offset_x: f64,
    /// Vertical distance of both wheel centres below the canvas centre
    pub offset_y: f64,
    pub key_radius: f64,
    pub chord_radius: f64,
    pub dot_radius: f64,
    /// Outer radius of the bass ring
    pub ring_radius: f64,
    pub ring_width: f64,
}

impl WheelGeometry {
    /// The fixed sizes of the original 1280×720 layout, whatever the canvas.
    pub fn reference() -> Self {
        Self {
            offset_x: WHEEL_OFFSET_X,
            offset_y: WHEEL_OFFSET_Y,
            key_radius: KEY_WHEEL_RADIUS,
            chord_radius: CHORD_WHEEL_RADIUS,
            dot_radius: DOT_RADIUS,
            ring_radius: DOT_RADIUS + BASS_RING_EXTRA,
            ring_width: BASS_RING_WIDTH,
        }
    }

    /// Reference sizes scaled to fit a `width`×`height` canvas.
    ///
    /// The factor is `min(width / 1280, height / 720)`, so the reference
    /// canvas gets exactly [`WheelGeometry::reference`].
    pub fn for_canvas(width: u32, height: u32) -> Self {
        let factor = (width as f64 / REFERENCE_WIDTH).min(height as f64 / REFERENCE_HEIGHT);
        Self::reference().scaled(factor)
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            offset_x: self.offset_x * factor,
            offset_y: self.offset_y * factor,
            key_radius: self.key_radius * factor,
            chord_radius: self.chord_radius * factor,
            dot_radius: self.dot_radius * factor,
            ring_radius: self.ring_radius * factor,
            ring_width: (self.ring_width * factor).max(1.0),
        }
    }

    pub fn key_center(&self, width: u32, height: u32) -> (f64, f64) {
        (
            width as f64 / 2.0 - self.offset_x,
            height as f64 / 2.0 + self.offset_y,
        )
    }

    pub fn chord_center(&self, width: u32, height: u32) -> (f64, f64) {
        (
            width as f64 / 2.0 + self.offset_x,
            height as f64 / 2.0 + self.offset_y,
        )
    }
}

/// Point at `fraction` of a full turn, clockwise from 12 o'clock.
pub fn polar_point(center: (f64, f64), radius: f64, fraction: f64) -> (f64, f64) {
    let angle = 2.0 * std::f64::consts::PI * fraction;
    (center.0 + radius * angle.sin(), center.1 - radius * angle.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn polar_point_runs_clockwise_from_top() {
        let c = (100.0, 100.0);
        assert!(close(polar_point(c, 10.0, 0.0), (100.0, 90.0)));
        assert!(close(polar_point(c, 10.0, 0.25), (110.0, 100.0)));
        assert!(close(polar_point(c, 10.0, 0.5), (100.0, 110.0)));
    }

    #[test]
    fn reference_canvas_is_unscaled() {
        assert_eq!(WheelGeometry::for_canvas(1280, 720), WheelGeometry::reference());
    }

    #[test]
    fn half_canvas_halves_everything() {
        let g = WheelGeometry::for_canvas(640, 360);
        assert_eq!(g.key_radius, 80.0);
        assert_eq!(g.dot_radius, 15.0);
        assert_eq!(g.ring_radius, 20.0);
        assert_eq!(g.key_center(640, 360), (195.0, 220.0));
    }
}

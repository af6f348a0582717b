//! # On-Screen Joystick
//!
//! Maps raw touch coordinates on a circular stick to a knob position and a
//! normalized, sensitivity-scaled vector.
//!
//! ## Geometry
//!
//! The knob (radius `r`) travels inside the track (radius `R`), so its center
//! can move at most `R - r` away from the stick center. Touches further out
//! are pulled back onto that circle.
//!
//! ## Normalization
//!
//! `output = displacement / (R - r) * sensitivity`, then each axis is clamped
//! to `[-1, 1]` on its own. Screen coordinates are kept as-is: up and left
//! are negative.
//!
//! ## Usage
//!
//! ```
//! use remote_pad::input::joystick::{Joystick, Point, StickGeometry, StickSignal};
//!
//! let geometry = StickGeometry::new(Point::new(100.0, 100.0), 100.0, 40.0)?;
//! let mut stick = Joystick::new(geometry, 1.0);
//!
//! // Far right of the track: full deflection
//! assert_eq!(stick.touch(Point::new(300.0, 100.0)), StickSignal::Moved { x: 1.0, y: 0.0 });
//! assert_eq!(stick.release(), StickSignal::Released);
//! # Ok::<(), remote_pad::error::RemotePadError>(())
//! ```

use crate::error::{RemotePadError, Result};
use crate::input::event::{AnalogSource, InputEvent};

/// Point in view coordinates (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Track and knob dimensions of one stick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickGeometry {
    center: Point,
    outer_radius: f64,
    inner_radius: f64,
}

impl StickGeometry {
    /// Creates a stick geometry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeometry` unless `outer_radius > inner_radius >= 0`
    /// and all values are finite.
    pub fn new(center: Point, outer_radius: f64, inner_radius: f64) -> Result<Self> {
        let finite = center.x.is_finite()
            && center.y.is_finite()
            && outer_radius.is_finite()
            && inner_radius.is_finite();

        if !finite || inner_radius < 0.0 || outer_radius <= inner_radius {
            return Err(RemotePadError::InvalidGeometry(format!(
                "outer radius {} must exceed knob radius {}",
                outer_radius, inner_radius
            )));
        }

        Ok(Self {
            center,
            outer_radius,
            inner_radius,
        })
    }

    /// Derives the geometry from the stick's view bounds.
    ///
    /// The track fills the smaller dimension and the knob takes
    /// `knob_ratio` of the track radius.
    ///
    /// # Examples
    ///
    /// ```
    /// use remote_pad::input::joystick::StickGeometry;
    ///
    /// let geometry = StickGeometry::from_bounds(300.0, 200.0, 0.4)?;
    /// assert_eq!(geometry.outer_radius(), 100.0);
    /// assert!((geometry.max_travel() - 60.0).abs() < 1e-9);
    /// # Ok::<(), remote_pad::error::RemotePadError>(())
    /// ```
    pub fn from_bounds(width: f64, height: f64, knob_ratio: f64) -> Result<Self> {
        let outer_radius = width.min(height) / 2.0;
        Self::new(
            Point::new(width / 2.0, height / 2.0),
            outer_radius,
            outer_radius * knob_ratio,
        )
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    #[must_use]
    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    #[must_use]
    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    /// Furthest the knob center may move from the stick center (`R - r`).
    #[must_use]
    pub fn max_travel(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    /// View point at a deflection of `(x, y)` max-travel units from center.
    #[must_use]
    pub fn point_at(&self, x: f64, y: f64) -> Point {
        let travel = self.max_travel();
        Point::new(self.center.x + x * travel, self.center.y + y * travel)
    }
}

/// Result of normalizing one touch point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalized {
    /// Knob position to render, always within `max_travel` of the center.
    pub knob: Point,
    /// Normalized X in `[-1, 1]`.
    pub x: f64,
    /// Normalized Y in `[-1, 1]`.
    pub y: f64,
}

/// Clamps to `[-1, 1]`, mapping NaN and infinities to 0.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Normalizes a touch point on a stick.
///
/// The knob position ignores `sensitivity`; only the output vector is scaled.
/// A non-finite touch point is treated as a touch at the center.
#[must_use]
pub fn normalize(geometry: &StickGeometry, touch: Point, sensitivity: f64) -> Normalized {
    let center = geometry.center();
    let max_travel = geometry.max_travel();

    if !touch.x.is_finite() || !touch.y.is_finite() {
        return Normalized {
            knob: center,
            x: 0.0,
            y: 0.0,
        };
    }

    let dx = touch.x - center.x;
    let dy = touch.y - center.y;
    let distance = dx.hypot(dy);

    // Touches at the center skip this branch, so distance is never zero here
    let (knob, unit_x, unit_y) = if distance > max_travel {
        let (ux, uy) = (dx / distance, dy / distance);
        (
            Point::new(center.x + ux * max_travel, center.y + uy * max_travel),
            ux,
            uy,
        )
    } else {
        (touch, dx / max_travel, dy / max_travel)
    };

    Normalized {
        knob,
        x: clamp_unit(unit_x * sensitivity),
        y: clamp_unit(unit_y * sensitivity),
    }
}

/// Output of a stick interaction.
///
/// `Released` is distinct from a mid-gesture `Moved { 0, 0 }` so consumers
/// holding edge state know to reset it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StickSignal {
    Moved { x: f64, y: f64 },
    Released,
}

impl StickSignal {
    /// Normalized position carried by the signal; `(0, 0)` on release.
    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        match *self {
            StickSignal::Moved { x, y } => (x, y),
            StickSignal::Released => (0.0, 0.0),
        }
    }

    /// Analog event for the given stick.
    #[must_use]
    pub fn to_event(&self, source: AnalogSource) -> InputEvent {
        let (x, y) = self.position();
        InputEvent::analog(source, x, y)
    }
}

/// Stateful stick: tracks the rendered knob and the active sensitivity.
#[derive(Debug, Clone)]
pub struct Joystick {
    geometry: StickGeometry,
    sensitivity: f64,
    knob: Point,
    pressed: bool,
}

impl Joystick {
    /// Creates a stick with the knob resting at the center.
    #[must_use]
    pub fn new(geometry: StickGeometry, sensitivity: f64) -> Self {
        Self {
            geometry,
            sensitivity,
            knob: geometry.center(),
            pressed: false,
        }
    }

    #[must_use]
    pub fn geometry(&self) -> &StickGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    pub fn set_sensitivity(&mut self, sensitivity: f64) {
        self.sensitivity = sensitivity;
    }

    /// Current knob center in view coordinates.
    #[must_use]
    pub fn knob(&self) -> Point {
        self.knob
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Replaces the geometry (view resized) and recenters the knob.
    pub fn resize(&mut self, geometry: StickGeometry) {
        self.geometry = geometry;
        self.knob = geometry.center();
    }

    /// Handles a touch down or move at `point`.
    pub fn touch(&mut self, point: Point) -> StickSignal {
        let normalized = normalize(&self.geometry, point, self.sensitivity);
        self.knob = normalized.knob;
        self.pressed = true;
        StickSignal::Moved {
            x: normalized.x,
            y: normalized.y,
        }
    }

    /// Handles touch up or cancel: recenters the knob.
    pub fn release(&mut self) -> StickSignal {
        self.knob = self.geometry.center();
        self.pressed = false;
        StickSignal::Released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> StickGeometry {
        // max travel = 60
        StickGeometry::new(Point::new(100.0, 100.0), 100.0, 40.0).unwrap()
    }

    fn sample_points() -> Vec<Point> {
        let mut points = Vec::new();
        for i in -10..=10 {
            for j in -10..=10 {
                points.push(Point::new(100.0 + f64::from(i) * 23.0, 100.0 + f64::from(j) * 17.0));
            }
        }
        points
    }

    // ==================== Geometry Tests ====================

    #[test]
    fn test_geometry_rejects_knob_as_large_as_track() {
        assert!(StickGeometry::new(Point::default(), 40.0, 40.0).is_err());
        assert!(StickGeometry::new(Point::default(), 30.0, 40.0).is_err());
        assert!(StickGeometry::new(Point::default(), 40.0, -1.0).is_err());
        assert!(StickGeometry::new(Point::default(), f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_geometry_from_bounds() {
        let g = StickGeometry::from_bounds(200.0, 300.0, 0.4).unwrap();
        assert_eq!(g.center(), Point::new(100.0, 150.0));
        assert_eq!(g.outer_radius(), 100.0);
        assert!((g.inner_radius() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_geometry_from_empty_bounds_fails() {
        assert!(StickGeometry::from_bounds(0.0, 0.0, 0.4).is_err());
    }

    #[test]
    fn test_point_at_deflection() {
        let geometry = geometry();
        assert_eq!(geometry.point_at(0.0, 0.0), Point::new(100.0, 100.0));
        assert_eq!(geometry.point_at(1.0, -0.5), Point::new(160.0, 70.0));

        let normalized = normalize(&geometry, geometry.point_at(0.5, 0.0), 1.0);
        assert_eq!((normalized.x, normalized.y), (0.5, 0.0));
    }

    // ==================== Normalization Tests ====================

    #[test]
    fn test_touch_at_center_is_zero() {
        let n = normalize(&geometry(), Point::new(100.0, 100.0), 1.0);
        assert_eq!(n.x, 0.0);
        assert_eq!(n.y, 0.0);
        assert_eq!(n.knob, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_touch_inside_track_is_linear() {
        let n = normalize(&geometry(), Point::new(130.0, 70.0), 1.0);
        assert!((n.x - 0.5).abs() < 1e-9);
        assert!((n.y - (-0.5)).abs() < 1e-9);
        assert_eq!(n.knob, Point::new(130.0, 70.0));
    }

    #[test]
    fn test_touch_outside_track_clamps_knob_to_circle() {
        let g = geometry();
        for point in sample_points() {
            if point.distance_to(g.center()) > g.max_travel() {
                let n = normalize(&g, point, 1.0);
                let d = n.knob.distance_to(g.center());
                assert!((d - g.max_travel()).abs() < 1e-9, "knob at {} for {:?}", d, point);
            }
        }
    }

    #[test]
    fn test_output_within_unit_range_for_any_sensitivity() {
        let g = geometry();
        for sensitivity in [0.1, 0.5, 1.0, 1.5, 2.0, 10.0] {
            for point in sample_points() {
                let n = normalize(&g, point, sensitivity);
                assert!((-1.0..=1.0).contains(&n.x));
                assert!((-1.0..=1.0).contains(&n.y));
            }
        }
    }

    #[test]
    fn test_non_finite_touch_is_centered() {
        let g = geometry();
        for point in [
            Point::new(f64::NAN, 100.0),
            Point::new(100.0, f64::INFINITY),
            Point::new(f64::NEG_INFINITY, f64::NAN),
        ] {
            let n = normalize(&g, point, 1.0);
            assert_eq!((n.x, n.y), (0.0, 0.0), "for {:?}", point);
            assert_eq!(n.knob, g.center());
        }
    }

    #[test]
    fn test_non_finite_sensitivity_yields_zero() {
        let n = normalize(&geometry(), Point::new(130.0, 100.0), f64::NAN);
        assert_eq!((n.x, n.y), (0.0, 0.0));
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(0.25), 0.25);
        assert_eq!(clamp_unit(-4.0), -1.0);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_sensitivity_scales_output_not_knob() {
        let g = geometry();
        let low = normalize(&g, Point::new(115.0, 100.0), 1.0);
        let high = normalize(&g, Point::new(115.0, 100.0), 2.0);
        assert_eq!(low.knob, high.knob);
        assert!((low.x - 0.25).abs() < 1e-9);
        assert!((high.x - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_high_sensitivity_clamps_each_axis() {
        let n = normalize(&geometry(), Point::new(145.0, 115.0), 2.0);
        assert_eq!(n.x, 1.0);
        assert!((n.y - 0.5).abs() < 1e-9);
    }

    // ==================== Joystick Tests ====================

    #[test]
    fn test_joystick_touch_moves_knob() {
        let mut stick = Joystick::new(geometry(), 1.0);
        let signal = stick.touch(Point::new(400.0, 100.0));
        assert_eq!(signal, StickSignal::Moved { x: 1.0, y: 0.0 });
        assert_eq!(stick.knob(), Point::new(160.0, 100.0));
        assert!(stick.is_pressed());
    }

    #[test]
    fn test_joystick_release_recenters() {
        let mut stick = Joystick::new(geometry(), 1.0);
        stick.touch(Point::new(50.0, 50.0));
        assert_eq!(stick.release(), StickSignal::Released);
        assert_eq!(stick.knob(), Point::new(100.0, 100.0));
        assert!(!stick.is_pressed());
    }

    #[test]
    fn test_released_signal_is_zero_analog_event() {
        let event = StickSignal::Released.to_event(AnalogSource::LeftStick);
        assert_eq!(event, InputEvent::analog(AnalogSource::LeftStick, 0.0, 0.0));
    }

    #[test]
    fn test_resize_recenters_knob() {
        let mut stick = Joystick::new(geometry(), 1.0);
        stick.touch(Point::new(130.0, 100.0));
        let bigger = StickGeometry::from_bounds(400.0, 400.0, 0.4).unwrap();
        stick.resize(bigger);
        assert_eq!(stick.knob(), Point::new(200.0, 200.0));
    }
}

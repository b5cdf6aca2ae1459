//! Jar boundary description.
//!
//! The collidable outline is a flat floor at `bottom`, a curved bowl between
//! `curve_start` and `bottom`, and straight vertical walls above
//! `curve_start`. Values are validated once at construction so the resolvers
//! never see an inverted or NaN jar.

use serde::Serialize;

use super::error::GeometryError;

/// Inset between the canvas edge and the jar walls.
pub const CANVAS_MARGIN: f64 = 10.0;

/// Fraction of the canvas height at which the bowl curve begins.
pub const CURVE_START_FRACTION: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JarGeometry {
    left: f64,
    right: f64,
    bottom: f64,
    curve_start: f64,
}

impl JarGeometry {
    pub fn new(left: f64, right: f64, bottom: f64, curve_start: f64) -> Result<Self, GeometryError> {
        if ![left, right, bottom, curve_start].iter().all(|v| v.is_finite()) {
            return Err(GeometryError::NonFinite { left, right, bottom, curve_start });
        }
        if left >= right {
            return Err(GeometryError::InvalidExtent { left, right });
        }
        if curve_start >= bottom {
            return Err(GeometryError::InvalidCurve { curve_start, bottom });
        }
        Ok(Self { left, right, bottom, curve_start })
    }

    /// Lay a jar out inside a canvas of the given size.
    pub fn from_canvas(width: f64, height: f64) -> Result<Self, GeometryError> {
        if !(width > 2.0 * CANVAS_MARGIN && height > CANVAS_MARGIN) {
            return Err(GeometryError::CanvasTooSmall { width, height });
        }
        Self::new(
            CANVAS_MARGIN,
            width - CANVAS_MARGIN,
            height - CANVAS_MARGIN,
            height * CURVE_START_FRACTION,
        )
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    pub fn curve_start(&self) -> f64 {
        self.curve_start
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn center_x(&self) -> f64 {
        0.5 * (self.left + self.right)
    }

    /// Radius of the bowl, half the jar width.
    pub fn curve_radius(&self) -> f64 {
        0.5 * self.width()
    }

    pub fn curve_height(&self) -> f64 {
        self.bottom - self.curve_start
    }

    /// Half-width of the bowl at height `y`. Heights outside the curved
    /// span clamp to the narrowest point instead of producing NaN.
    pub fn bowl_half_width(&self, y: f64) -> f64 {
        let n = (y - self.curve_start) / self.curve_height();
        self.curve_radius() * (1.0 - n * n).max(0.0).sqrt()
    }
}

impl Default for JarGeometry {
    /// Jar for the default 250x300 canvas.
    fn default() -> Self {
        Self {
            left: CANVAS_MARGIN,
            right: 250.0 - CANVAS_MARGIN,
            bottom: 300.0 - CANVAS_MARGIN,
            curve_start: 300.0 * CURVE_START_FRACTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn canvas_layout() {
        let g = JarGeometry::from_canvas(250.0, 300.0).unwrap();
        assert_eq!(g, JarGeometry::default());
        assert_relative_eq!(g.left(), 10.0);
        assert_relative_eq!(g.right(), 240.0);
        assert_relative_eq!(g.bottom(), 290.0);
        assert_relative_eq!(g.curve_start(), 90.0);
        assert_relative_eq!(g.center_x(), 125.0);
        assert_relative_eq!(g.curve_radius(), 115.0);
    }

    #[test]
    fn rejects_bad_bounds() {
        assert!(matches!(
            JarGeometry::new(10.0, 10.0, 100.0, 0.0),
            Err(GeometryError::InvalidExtent { .. })
        ));
        assert!(matches!(
            JarGeometry::new(0.0, 10.0, 100.0, 100.0),
            Err(GeometryError::InvalidCurve { .. })
        ));
        assert!(matches!(
            JarGeometry::new(0.0, f64::NAN, 100.0, 0.0),
            Err(GeometryError::NonFinite { .. })
        ));
        assert!(matches!(
            JarGeometry::from_canvas(15.0, 300.0),
            Err(GeometryError::CanvasTooSmall { .. })
        ));
    }

    #[test]
    fn bowl_width_clamps_outside_curve() {
        let g = JarGeometry::new(0.0, 200.0, 300.0, 100.0).unwrap();
        assert_relative_eq!(g.bowl_half_width(100.0), 100.0);
        assert_relative_eq!(g.bowl_half_width(300.0), 0.0);
        assert_relative_eq!(g.bowl_half_width(450.0), 0.0);
        assert!(g.bowl_half_width(-500.0).is_finite());
    }
}

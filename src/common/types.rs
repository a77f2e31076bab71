//! Common types used throughout roadmap_planner

use nalgebra::Vector2;

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// Circular obstacle given by its center and diameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Point2D,
    pub diameter: f64,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, diameter: f64) -> Self {
        Self {
            center: Point2D::new(x, y),
            diameter,
        }
    }

    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    /// Whether a sample at `p` lies inside the placement exclusion zone.
    ///
    /// The zone extends a full diameter from the center, twice the true
    /// radius, so sampled nodes keep a clearance margin from the obstacle.
    pub fn excludes_sample(&self, p: &Point2D) -> bool {
        self.center.distance(p) < self.diameter
    }
}

/// Axis-aligned rectangle used as the sampling region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point2D,
    pub max: Point2D,
}

impl Bounds {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min: Point2D::new(x0, y0),
            max: Point2D::new(x1, y1),
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.min.x, self.min.y, self.max.x, self.max.y]
            .iter()
            .all(|v| v.is_finite())
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && (self.max.x - self.min.x).is_finite()
            && (self.max.y - self.min.y).is_finite()
    }

    pub fn contains(&self, p: &Point2D) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(-0.5, -0.5, 0.5, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point2d_distance() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(3.0, 4.0);
        assert!((p1.distance(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_obstacle_exclusion_uses_diameter() {
        let obstacle = Obstacle::new(0.0, 0.0, 2.0);
        // outside the radius but inside the diameter margin
        assert!(obstacle.excludes_sample(&Point2D::new(1.5, 0.0)));
        assert!(!obstacle.excludes_sample(&Point2D::new(2.0, 0.0)));
    }

    #[test]
    fn test_bounds_validity() {
        assert!(Bounds::default().is_valid());
        assert!(Bounds::new(1.0, 1.0, 1.0, 1.0).is_valid());
        assert!(!Bounds::new(1.0, 0.0, 0.0, 1.0).is_valid());
        assert!(!Bounds::new(0.0, 0.0, f64::NAN, 1.0).is_valid());
        // finite corners whose extent overflows
        assert!(!Bounds::new(-1e308, 0.0, 1e308, 1.0).is_valid());
        assert!(!Bounds::new(0.0, -f64::MAX, 1.0, f64::MAX).is_valid());
    }
}

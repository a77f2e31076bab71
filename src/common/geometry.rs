//! Planar geometry primitives for edge weights, heuristics and visibility

use crate::common::types::{Obstacle, Point2D};

/// Euclidean distance between two points
pub fn distance(p1: &Point2D, p2: &Point2D) -> f64 {
    (p2.to_vector() - p1.to_vector()).norm()
}

/// Closest point to `p` on the segment `a`-`b`.
///
/// The projection parameter is clamped to [0, 1] so the result never leaves
/// the segment. A zero-length segment collapses to `a`.
pub fn closest_point_on_segment(a: &Point2D, b: &Point2D, p: &Point2D) -> Point2D {
    let a_v = a.to_vector();
    let ab = b.to_vector() - a_v;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return *a;
    }
    let t = (ab.dot(&(p.to_vector() - a_v)) / len_sq).clamp(0.0, 1.0);
    Point2D::from(a_v + ab * t)
}

/// Whether the segment `p1`-`p2` touches the disc of the given diameter around `center`
pub fn segment_intersects_circle(p1: &Point2D, p2: &Point2D, center: &Point2D, diameter: f64) -> bool {
    let closest = closest_point_on_segment(p1, p2, center);
    distance(&closest, center) <= diameter / 2.0
}

/// Line of sight between two points: no obstacle touches the segment
pub fn is_visible(p1: &Point2D, p2: &Point2D, obstacles: &[Obstacle]) -> bool {
    !obstacles
        .iter()
        .any(|o| segment_intersects_circle(p1, p2, &o.center, o.diameter))
}

//! Line segment orientation and intersection tests.
//!
//! All comparisons are exact. With `CoordinateMode::Integer` every input is
//! integral and the results are exact as well; with floating coordinates
//! nearly colinear triples may be classified either way.

use super::{Point, Segment, Vec2};
use crate::error::GeometryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Colinear,
    Clockwise,
    CounterClockwise,
}

/// Orientation of the ordered triplet (p, q, r).
pub fn orientation(p: &Point, q: &Point, r: &Point) -> Orientation {
    let value = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);

    if value == 0.0 {
        Orientation::Colinear
    } else if value > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Given colinear p, q, r: does q lie inside the bounding box of p and r.
pub fn on_segment(p: &Point, q: &Point, r: &Point) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Returns true if segment p1p2 and segment q1q2 intersect, touching included.
pub fn do_intersect(p1: &Point, p2: &Point, q1: &Point, q2: &Point) -> bool {
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);

    // General case
    if o1 != o2 && o3 != o4 {
        return true;
    }

    // p1, p2 and q1 are colinear and q1 lies on p1p2
    if o1 == Orientation::Colinear && on_segment(p1, q1, p2) {
        return true;
    }

    // p1, p2 and q2 are colinear and q2 lies on p1p2
    if o2 == Orientation::Colinear && on_segment(p1, q2, p2) {
        return true;
    }

    // q1, q2 and p1 are colinear and p1 lies on q1q2
    if o3 == Orientation::Colinear && on_segment(q1, p1, q2) {
        return true;
    }

    // q1, q2 and p2 are colinear and p2 lies on q1q2
    o4 == Orientation::Colinear && on_segment(q1, p2, q2)
}

fn cross(a: &Vec2, b: &Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Intersection point of the lines through `p` and `q`.
///
/// Only meaningful once [`do_intersect`] confirmed a crossing. Parallel and
/// coincident lines have no unique solution and are reported as an error.
pub fn intersect_point(p: &Segment, q: &Segment) -> Result<Point, GeometryError> {
    let r = p.end - p.start;
    let s = q.end - q.start;
    let denominator = cross(&r, &s);

    if denominator == 0.0 {
        return Err(GeometryError::NoUniqueIntersection);
    }

    let t = cross(&(q.start - p.start), &s) / denominator;
    Ok(p.start + r * t)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Segment predicates and line intersection.
//!
//! Exact sign tests on `f64` cross products, no epsilon. The only tolerance in
//! this module is [`AXIS_TOLERANCE_SQ`], used to classify nearly vertical and
//! nearly horizontal lines when intersecting extended lines, since plan
//! coordinates arrive after rotation/scale transforms and carry float noise.

use crate::point::Point2D;

/// Squared coordinate delta below which a line counts as axis-aligned.
pub const AXIS_TOLERANCE_SQ: f64 = 1e-4;

/// Turn direction of an ordered point triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Colinear,
    Clockwise,
    CounterClockwise,
}

/// Orientation of `(p, q, r)` from the sign of `(q - p) × (r - q)`.
pub fn orientation(p: &Point2D, q: &Point2D, r: &Point2D) -> Orientation {
    let cross = p.vector_to(q).perp(&q.vector_to(r));
    if cross < 0.0 {
        Orientation::Clockwise
    } else if cross > 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Colinear
    }
}

/// True if `q` lies inside the axis-aligned bounding box of segment `p`–`r`.
///
/// Only meaningful as "q is on the segment" once colinearity is known; the
/// visibility code also uses it on its own to detect a ray ending on an edge.
pub fn on_segment(p: &Point2D, q: &Point2D, r: &Point2D) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// True if segment `p1`–`q1` touches segment `p2`–`q2`, colinear overlap included.
pub fn segments_intersect(p1: &Point2D, q1: &Point2D, p2: &Point2D, q2: &Point2D) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Colinear && on_segment(p1, p2, q1))
        || (o2 == Orientation::Colinear && on_segment(p1, q2, q1))
        || (o3 == Orientation::Colinear && on_segment(p2, p1, q2))
        || (o4 == Orientation::Colinear && on_segment(p2, q1, q2))
}

/// True if segment `a`–`b` crosses an edge of the closed `polygon`.
///
/// Edges whose bounding box contains `b` are ignored, so a sight line that
/// ends exactly on a corner or on the edge it is aimed at is not reported as
/// blocked by that edge. Zero-length edges are skipped. A two-point polygon is
/// treated as a single wall segment (traversed both ways).
pub fn boundary_intersects_excluding_touch(polygon: &[Point2D], a: &Point2D, b: &Point2D) -> bool {
    let n = polygon.len();
    (0..n).any(|i| {
        let start = &polygon[i];
        let end = &polygon[(i + 1) % n];
        start != end && !on_segment(start, b, end) && segments_intersect(a, b, start, end)
    })
}

/// Infinite line through two points, classified by axis alignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineForm {
    /// `y = c`
    Horizontal(f64),
    /// `x = c`
    Vertical(f64),
    /// `y = slope * x + intercept`
    Sloped { slope: f64, intercept: f64 },
}

impl LineForm {
    pub fn through(p1: &Point2D, p2: &Point2D) -> Self {
        let dx = p2.x - p1.x;
        let dy = p2.y - p1.y;
        if dy * dy < AXIS_TOLERANCE_SQ {
            LineForm::Horizontal(p1.y)
        } else if dx * dx < AXIS_TOLERANCE_SQ {
            LineForm::Vertical(p1.x)
        } else {
            let slope = dy / dx;
            LineForm::Sloped {
                slope,
                intercept: p2.y - slope * p2.x,
            }
        }
    }
}

/// Point where the infinite lines through `p1`–`p2` and `q1`–`q2` meet.
///
/// Returns `None` for parallel lines, including two horizontal or two
/// vertical lines.
pub fn intersection_of_extended_lines(
    p1: &Point2D,
    p2: &Point2D,
    q1: &Point2D,
    q2: &Point2D,
) -> Option<Point2D> {
    use LineForm::*;

    match (LineForm::through(p1, p2), LineForm::through(q1, q2)) {
        (Horizontal(_), Horizontal(_)) | (Vertical(_), Vertical(_)) => None,
        (Vertical(x), Horizontal(y)) | (Horizontal(y), Vertical(x)) => Some(Point2D::new(x, y)),
        (Horizontal(y), Sloped { slope, intercept })
        | (Sloped { slope, intercept }, Horizontal(y)) => {
            Some(Point2D::new((y - intercept) / slope, y))
        }
        (Vertical(x), Sloped { slope, intercept })
        | (Sloped { slope, intercept }, Vertical(x)) => {
            Some(Point2D::new(x, slope * x + intercept))
        }
        (
            Sloped {
                slope: m1,
                intercept: b1,
            },
            Sloped {
                slope: m2,
                intercept: b2,
            },
        ) => {
            let delta_m = m2 - m1;
            if delta_m.abs() < 1e-12 {
                return None;
            }
            let x = (b1 - b2) / delta_m;
            Some(Point2D::new(x, m2 * x + b2))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pt(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn test_orientation_signs() {
        let p = pt(0.0, 0.0);
        let q = pt(1.0, 0.0);
        assert_eq!(orientation(&p, &q, &pt(2.0, 1.0)), Orientation::CounterClockwise);
        assert_eq!(orientation(&p, &q, &pt(2.0, -1.0)), Orientation::Clockwise);
        assert_eq!(orientation(&p, &q, &pt(2.0, 0.0)), Orientation::Colinear);
    }

    #[test]
    fn test_on_segment_is_a_bounding_box_test() {
        let p = pt(0.0, 0.0);
        let r = pt(10.0, 10.0);
        assert!(on_segment(&p, &pt(5.0, 5.0), &r));
        // Off the diagonal, but inside the box
        assert!(on_segment(&p, &pt(2.0, 8.0), &r));
        assert!(!on_segment(&p, &pt(11.0, 5.0), &r));
    }

    #[test]
    fn test_crossing_segments_intersect() {
        assert!(segments_intersect(
            &pt(0.0, 0.0),
            &pt(10.0, 10.0),
            &pt(0.0, 10.0),
            &pt(10.0, 0.0)
        ));
        assert!(!segments_intersect(
            &pt(0.0, 0.0),
            &pt(4.0, 4.0),
            &pt(0.0, 10.0),
            &pt(10.0, 9.0)
        ));
    }

    #[test]
    fn test_touching_and_colinear_segments_intersect() {
        // T-junction: endpoint of one lies on the other
        assert!(segments_intersect(
            &pt(5.0, 0.0),
            &pt(5.0, 5.0),
            &pt(0.0, 5.0),
            &pt(10.0, 5.0)
        ));
        // Colinear overlap
        assert!(segments_intersect(
            &pt(0.0, 0.0),
            &pt(6.0, 0.0),
            &pt(4.0, 0.0),
            &pt(10.0, 0.0)
        ));
        // Colinear but disjoint
        assert!(!segments_intersect(
            &pt(0.0, 0.0),
            &pt(3.0, 0.0),
            &pt(4.0, 0.0),
            &pt(10.0, 0.0)
        ));
    }

    #[test]
    fn test_ray_to_corner_is_not_blocked_by_that_corner() {
        let square = [pt(0.0, 0.0), pt(100.0, 0.0), pt(100.0, 100.0), pt(0.0, 100.0)];
        let viewpoint = pt(50.0, 50.0);
        for corner in &square {
            assert!(!boundary_intersects_excluding_touch(&square, &viewpoint, corner));
        }
        // A point on an edge is not blocked by its own edge
        assert!(!boundary_intersects_excluding_touch(
            &square,
            &viewpoint,
            &pt(100.0, 30.0)
        ));
    }

    #[test]
    fn test_ray_through_wall_is_blocked() {
        let square = [pt(0.0, 0.0), pt(100.0, 0.0), pt(100.0, 100.0), pt(0.0, 100.0)];
        assert!(boundary_intersects_excluding_touch(
            &square,
            &pt(50.0, 50.0),
            &pt(150.0, 50.0)
        ));
    }

    #[test]
    fn test_two_point_wall_and_degenerate_edges() {
        let wall = [pt(50.0, -10.0), pt(50.0, 10.0)];
        assert!(boundary_intersects_excluding_touch(&wall, &pt(0.0, 0.0), &pt(100.0, 0.0)));
        assert!(!boundary_intersects_excluding_touch(&wall, &pt(0.0, 0.0), &pt(40.0, 0.0)));

        let point = [pt(50.0, 0.0)];
        assert!(!boundary_intersects_excluding_touch(&point, &pt(0.0, 0.0), &pt(100.0, 0.0)));
    }

    #[test]
    fn test_extended_line_intersections() {
        // Sloped with sloped
        let hit = intersection_of_extended_lines(
            &pt(0.0, 0.0),
            &pt(1.0, 1.0),
            &pt(0.0, 10.0),
            &pt(1.0, 9.0),
        )
        .unwrap();
        assert_relative_eq!(hit.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(hit.y, 5.0, epsilon = 1e-9);

        // Vertical with horizontal
        let hit = intersection_of_extended_lines(
            &pt(3.0, 0.0),
            &pt(3.0, 1.0),
            &pt(0.0, 7.0),
            &pt(1.0, 7.0),
        )
        .unwrap();
        assert_eq!(hit, pt(3.0, 7.0));

        // Sloped with vertical, far outside both segments
        let hit = intersection_of_extended_lines(
            &pt(0.0, 0.0),
            &pt(1.0, 2.0),
            &pt(10.0, 0.0),
            &pt(10.0, 1.0),
        )
        .unwrap();
        assert_relative_eq!(hit.y, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_near_axis_noise_is_absorbed() {
        // dx of 0.005 squared is below tolerance, so the first line is vertical
        let hit = intersection_of_extended_lines(
            &pt(2.0, 0.0),
            &pt(2.005, 10.0),
            &pt(0.0, 4.0),
            &pt(8.0, 4.0),
        )
        .unwrap();
        assert_eq!(hit, pt(2.0, 4.0));
    }

    #[test]
    fn test_parallel_lines_have_no_intersection() {
        assert!(intersection_of_extended_lines(
            &pt(0.0, 0.0),
            &pt(10.0, 0.0),
            &pt(0.0, 5.0),
            &pt(10.0, 5.0)
        )
        .is_none());
        assert!(intersection_of_extended_lines(
            &pt(0.0, 0.0),
            &pt(0.0, 10.0),
            &pt(5.0, 0.0),
            &pt(5.0, 10.0)
        )
        .is_none());
        assert!(intersection_of_extended_lines(
            &pt(0.0, 0.0),
            &pt(1.0, 1.0),
            &pt(0.0, 5.0),
            &pt(1.0, 6.0)
        )
        .is_none());
    }
}

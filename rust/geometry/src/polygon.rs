// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon utilities
//!
//! Polygons are plain `&[Point2D]` slices, implicitly closed. Winding is not
//! normalized anywhere in the workspace.

use crate::error::{Error, Result};
use crate::point::Point2D;

/// Axis-aligned bounding box of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point2D,
    pub max: Point2D,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Even-odd ray casting point-in-polygon test.
///
/// Points exactly on the boundary may land on either side. Fewer than three
/// vertices never contain anything.
pub fn polygon_contains(polygon: &[Point2D], point: &Point2D) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &polygon[i];
        let pj = &polygon[j];
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Shoelace signed area; positive for counter-clockwise winding.
pub fn signed_area(polygon: &[Point2D]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = &polygon[i];
            let b = &polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

pub fn polygon_area(polygon: &[Point2D]) -> f64 {
    signed_area(polygon).abs()
}

/// Bounding box, or `None` for an empty slice.
pub fn polygon_bounds(points: &[Point2D]) -> Option<Bounds> {
    let first = points.first()?;
    let mut bounds = Bounds {
        min: *first,
        max: *first,
    };
    for p in &points[1..] {
        bounds.min.x = bounds.min.x.min(p.x);
        bounds.min.y = bounds.min.y.min(p.y);
        bounds.max.x = bounds.max.x.max(p.x);
        bounds.max.y = bounds.max.y.max(p.y);
    }
    Some(bounds)
}

/// Vertex centroid (mean of the vertices), not the area centroid.
pub fn centroid(points: &[Point2D]) -> Option<Point2D> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point2D::new(sx / n, sy / n))
}

/// Drop consecutive duplicate vertices, including a closing vertex that
/// repeats the first.
pub fn dedup_closed(mut points: Vec<Point2D>) -> Vec<Point2D> {
    points.dedup();
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Check that `polygon` can serve as a room boundary: at least three
/// vertices, all finite.
pub fn validate_ring(polygon: &[Point2D]) -> Result<()> {
    if polygon.len() < 3 {
        return Err(Error::DegeneratePolygon(polygon.len()));
    }
    if let Some(bad) = polygon.iter().find(|p| !p.is_finite()) {
        return Err(Error::NonFiniteCoordinate { x: bad.x, y: bad.y });
    }
    Ok(())
}

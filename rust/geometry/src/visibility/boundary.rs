// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::bisect::{bisect_transition, BisectionConfig};
use super::VisibilityPolygon;
use crate::point::Point2D;
use crate::polygon::dedup_closed;
use crate::predicates::boundary_intersects_excluding_touch;

/// Visibility polygon of `viewpoint` against the room boundary alone.
pub fn boundary_visibility(
    viewpoint: &Point2D,
    boundary: &[Point2D],
    config: &BisectionConfig,
) -> VisibilityPolygon {
    let n = boundary.len();
    let mut vertices = Vec::with_capacity(n * 2);
    let mut converged = true;

    let blocked = |p: &Point2D| boundary_intersects_excluding_touch(boundary, viewpoint, p);
    let mut bisect = |from: Point2D, to: Point2D| {
        let result = bisect_transition(boundary, viewpoint, from, to, config);
        converged &= result.converged;
        result.point
    };

    for i in 0..n {
        let p1 = boundary[i];
        let p2 = boundary[(i + 1) % n];

        match (blocked(&p1), blocked(&p2)) {
            (false, false) => vertices.push(p1),
            (false, true) => {
                vertices.push(p1);
                vertices.push(bisect(p2, p1));
            }
            (true, false) => vertices.push(bisect(p1, p2)),
            (true, true) => {
                // Both corners hidden; the edge may still show through a gap.
                let mut a = bisect(p1, p2);
                let mut b = bisect(p2, p1);
                let a_collapsed = a.within_band(&p2, config.tolerance);
                let b_collapsed = b.within_band(&p1, config.tolerance);

                if a_collapsed && b_collapsed {
                    continue;
                }
                if a_collapsed {
                    a = bisect(p1, b);
                } else if b_collapsed {
                    b = bisect(p2, a);
                }
                vertices.push(a);
                vertices.push(b);
            }
        }
    }

    VisibilityPolygon {
        vertices: dedup_closed(vertices),
        converged,
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::point::Point2D;
use crate::polygon::{centroid, dedup_closed, polygon_contains};
use crate::predicates::{boundary_intersects_excluding_touch, intersection_of_extended_lines};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Anything that blocks line of sight inside a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occluder {
    pub polygon: Vec<Point2D>,
    /// Reference point used to order occluders by distance from a viewpoint.
    pub anchor: Point2D,
}

impl Occluder {
    /// Polygon occluder anchored at its vertex centroid.
    pub fn new(polygon: Vec<Point2D>) -> Self {
        let anchor = centroid(&polygon).unwrap_or_default();
        Self { polygon, anchor }
    }

    /// Free-standing wall segment, anchored at its start point.
    pub fn wall(start: Point2D, end: Point2D) -> Self {
        Self {
            polygon: vec![start, end],
            anchor: start,
        }
    }

    pub fn with_anchor(polygon: Vec<Point2D>, anchor: Point2D) -> Self {
        Self { polygon, anchor }
    }
}

/// A corner of the occluder seen through one visibility edge.
struct CornerHit {
    /// Distance from the edge start to where the corner ray meets the edge.
    distance: f64,
    /// Where the ray past the corner lands on the edge, unless the rest of
    /// the occluder shadows it.
    landing: Option<Point2D>,
    corner: Point2D,
}

/// Remove the shadow of `occluder` from the visibility polygon `visible`.
///
/// Each edge of `visible` is rebuilt with the occluder corners that fall in
/// its viewing wedge, in order along the edge. A corner whose ray continues
/// to the edge contributes a corner/landing pair, alternating which comes
/// first so the output stays simple. A corner whose continuation is hidden
/// by another part of the occluder contributes the corner alone.
pub fn clip_occluder(viewpoint: &Point2D, occluder: &[Point2D], visible: &[Point2D]) -> Vec<Point2D> {
    let n = visible.len();
    let mut clipped = Vec::with_capacity(n + occluder.len() * 2);
    let blocked = |p: &Point2D| boundary_intersects_excluding_touch(occluder, viewpoint, p);

    for i in 0..n {
        let p1 = visible[i];
        let p2 = visible[(i + 1) % n];
        let wedge = [*viewpoint, p1, p2];

        let mut hits: SmallVec<[CornerHit; 4]> = SmallVec::new();
        for (ci, corner) in occluder.iter().enumerate() {
            if !polygon_contains(&wedge, corner) || blocked(corner) {
                continue;
            }
            let Some(landing) = intersection_of_extended_lines(viewpoint, corner, &p1, &p2) else {
                continue;
            };

            let rest: SmallVec<[Point2D; 8]> = occluder
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != ci)
                .map(|(_, p)| *p)
                .collect();
            let shadowed = boundary_intersects_excluding_touch(&rest, viewpoint, &landing);

            hits.push(CornerHit {
                distance: landing.distance_to(&p1),
                landing: (!shadowed).then_some(landing),
                corner: *corner,
            });
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        let mut in_shadow = if blocked(&p1) {
            true
        } else {
            clipped.push(p1);
            false
        };

        for hit in &hits {
            match hit.landing {
                None => {
                    clipped.push(hit.corner);
                    in_shadow = true;
                }
                Some(landing) if in_shadow => {
                    clipped.push(hit.corner);
                    clipped.push(landing);
                    in_shadow = false;
                }
                Some(landing) => {
                    clipped.push(landing);
                    clipped.push(hit.corner);
                    in_shadow = true;
                }
            }
        }

        if !blocked(&p2) {
            clipped.push(p2);
        }
    }

    dedup_closed(clipped)
}

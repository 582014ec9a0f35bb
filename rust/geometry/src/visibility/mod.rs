// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Visibility Engine - occlusion-aware visibility polygons
//!
//! Two stages:
//! 1. [`boundary_visibility`] walks the room boundary and keeps the part of
//!    each edge visible from the viewpoint, approximating shadow transitions
//!    by bisection ([`bisect_transition`]).
//! 2. [`clip_occluder`] cuts each occluder's shadow out of that polygon.
//!    [`visibility_polygon`] runs it for every occluder, farthest first.
//!
//! The viewpoint must lie strictly inside the room. Points on the boundary
//! have no well-defined primary wedge and are not checked for here.

mod bisect;
mod boundary;
mod occluder;


pub use bisect::{bisect_transition, Bisection, BisectionConfig};
pub use boundary::boundary_visibility;
pub use occluder::{clip_occluder, Occluder};

use crate::point::Point2D;
use crate::polygon::{polygon_area, polygon_contains};
use serde::{Deserialize, Serialize};

/// Region visible from a viewpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityPolygon {
    pub vertices: Vec<Point2D>,
    /// False if any boundary bisection ran out of iterations before reaching
    /// the tolerance band. The polygon is still usable, just less precise.
    pub converged: bool,
}

impl VisibilityPolygon {
    pub fn area(&self) -> f64 {
        polygon_area(&self.vertices)
    }

    pub fn contains(&self, point: &Point2D) -> bool {
        polygon_contains(&self.vertices, point)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Full visibility polygon of `viewpoint` inside `boundary`, with every
/// occluder's shadow removed.
///
/// Occluders are applied in order of decreasing squared distance from their
/// anchor to the viewpoint; equal distances keep the caller's order.
pub fn visibility_polygon(
    viewpoint: &Point2D,
    boundary: &[Point2D],
    occluders: &[Occluder],
    config: &BisectionConfig,
) -> VisibilityPolygon {
    let mut visible = boundary_visibility(viewpoint, boundary, config);

    let mut ordered: Vec<(f64, &Occluder)> = occluders
        .iter()
        .map(|o| (o.anchor.distance_squared_to(viewpoint), o))
        .collect();
    ordered.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (_, occluder) in ordered {
        visible.vertices = clip_occluder(viewpoint, &occluder.polygon, &visible.vertices);
    }

    visible
}

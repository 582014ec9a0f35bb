// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floorspace Geometry
//!
//! 2D geometry kernel for indoor floor plans: segment predicates, polygon
//! utilities, furniture footprints and occlusion-aware visibility polygons.
//! Uses nalgebra for vector math.

pub mod error;
pub mod footprint;
pub mod point;
pub mod polygon;
pub mod predicates;
pub mod visibility;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

pub use error::{Error, Result};
pub use footprint::Footprint;
pub use point::Point2D;
pub use polygon::{
    centroid, dedup_closed, polygon_area, polygon_bounds, polygon_contains, signed_area,
    validate_ring, Bounds,
};
pub use predicates::{
    boundary_intersects_excluding_touch, intersection_of_extended_lines, on_segment,
    orientation, segments_intersect, LineForm, Orientation,
};
pub use visibility::{
    bisect_transition, boundary_visibility, clip_occluder, visibility_polygon, Bisection,
    BisectionConfig, Occluder, VisibilityPolygon,
};

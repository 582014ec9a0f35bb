// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-point visibility queries.

use floorspace_geometry::{visibility_polygon, BisectionConfig, Point2D, VisibilityPolygon};

use crate::error::Result;
use crate::plan::FloorPlan;

/// What can be seen from `point`: the visibility polygon inside the room
/// containing it, with the room's columns and free-standing walls as
/// occluders. `None` when the point is in no room.
pub fn viewpoint(
    plan: &FloorPlan,
    point: Point2D,
    config: &BisectionConfig,
) -> Result<Option<VisibilityPolygon>> {
    let Some(index) = plan.room_at(&point) else {
        tracing::debug!(x = point.x, y = point.y, "viewpoint outside every room");
        return Ok(None);
    };
    let occluders = plan.occluders_for(index)?;
    let room = plan.room(index)?;
    let polygon = visibility_polygon(&point, &room.boundary, &occluders, config);
    tracing::debug!(
        room = index,
        occluders = occluders.len(),
        vertices = polygon.len(),
        converged = polygon.converged,
        "computed viewpoint"
    );
    Ok(Some(polygon))
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor plan input model.
//!
//! A floor is a list of rooms, the doors between them and the walls drawn on
//! it. Rooms carry their own furniture, columns and chairs. Everything is in
//! plan coordinates; room `i` of [`FloorPlan::rooms`] is room index `i` in
//! every mesh and graph built from the plan.

use std::path::Path;

use floorspace_geometry::{
    centroid, polygon_contains, validate_ring, Footprint, Occluder, Point2D,
};
use floorspace_topology::{Mesh, MeshConfig};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorPlan {
    pub rooms: Vec<RoomPlan>,
    /// Door positions. Doors are not owned by a room.
    pub doors: Vec<Point2D>,
    pub walls: Vec<WallPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomPlan {
    pub label: Option<String>,
    /// Room outline, implicitly closed.
    pub boundary: Vec<Point2D>,
    /// Items people walk around but can see over.
    pub furniture: Vec<ObstaclePlan>,
    /// Items that block both movement and sight.
    pub columns: Vec<ObstaclePlan>,
    pub chairs: Vec<Point2D>,
}

/// An obstacle given either as an explicit outline or as a placed rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObstaclePlan {
    Polygon {
        polygon: Vec<Point2D>,
    },
    Placement {
        center: Point2D,
        width: f64,
        depth: f64,
        /// Counter-clockwise, radians.
        #[serde(default)]
        rotation: f64,
    },
}

impl ObstaclePlan {
    pub fn footprint(&self) -> Result<Footprint> {
        match self {
            ObstaclePlan::Polygon { polygon } => Ok(Footprint::new(polygon.clone())),
            ObstaclePlan::Placement {
                center,
                width,
                depth,
                rotation,
            } => Ok(Footprint::from_placement(*center, *width, *depth, *rotation)?),
        }
    }

    /// Occluder anchored at the placement centre, or at the outline's vertex
    /// centroid.
    pub fn occluder(&self) -> Result<Occluder> {
        let footprint = self.footprint()?;
        let anchor = match self {
            ObstaclePlan::Placement { center, .. } => *center,
            ObstaclePlan::Polygon { polygon } => centroid(polygon).unwrap_or_default(),
        };
        Ok(Occluder::with_anchor(footprint.corners, anchor))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallPlan {
    pub start: Point2D,
    pub end: Point2D,
}

impl FloorPlan {
    /// Parses and validates a plan.
    pub fn from_json(json: &str) -> Result<Self> {
        let plan: Self = serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        plan.validate()?;
        Ok(plan)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Every room boundary is a usable ring and every obstacle has a
    /// footprint.
    pub fn validate(&self) -> Result<()> {
        for room in &self.rooms {
            validate_ring(&room.boundary)?;
            for obstacle in room.furniture.iter().chain(&room.columns) {
                obstacle.footprint()?;
            }
        }
        Ok(())
    }

    pub fn room(&self, index: usize) -> Result<&RoomPlan> {
        self.rooms.get(index).ok_or(Error::RoomOutOfRange {
            index,
            count: self.rooms.len(),
        })
    }

    /// Index of the first room containing `point`.
    pub fn room_at(&self, point: &Point2D) -> Option<usize> {
        self.rooms
            .iter()
            .position(|room| polygon_contains(&room.boundary, point))
    }

    /// Walls with neither endpoint on a room corner.
    pub fn rogue_walls(&self) -> Vec<WallPlan> {
        let is_corner = |p: &Point2D| self.rooms.iter().any(|room| room.boundary.contains(p));
        self.walls
            .iter()
            .filter(|wall| !is_corner(&wall.start) && !is_corner(&wall.end))
            .copied()
            .collect()
    }

    /// Footprints that remove mesh samples from room `index`.
    pub fn obstacles_for(&self, index: usize) -> Result<Vec<Footprint>> {
        let room = self.room(index)?;
        room.furniture
            .iter()
            .chain(&room.columns)
            .map(ObstaclePlan::footprint)
            .collect()
    }

    /// Sight blockers of room `index`: its columns, plus every rogue wall
    /// whose start point lies inside it.
    pub fn occluders_for(&self, index: usize) -> Result<Vec<Occluder>> {
        let room = self.room(index)?;
        let mut occluders = room
            .columns
            .iter()
            .map(ObstaclePlan::occluder)
            .collect::<Result<Vec<_>>>()?;

        occluders.extend(
            self.rogue_walls()
                .into_iter()
                .filter(|wall| polygon_contains(&room.boundary, &wall.start))
                .map(|wall| Occluder::wall(wall.start, wall.end)),
        );
        Ok(occluders)
    }

    /// Pruned mesh of every room, in room order.
    pub fn meshes(&self, config: &MeshConfig) -> Result<Vec<Mesh>> {
        (0..self.rooms.len())
            .map(|i| -> Result<Mesh> {
                let obstacles = self.obstacles_for(i)?;
                Ok(Mesh::build(i as u32, &self.rooms[i].boundary, &obstacles, config)?)
            })
            .collect()
    }

    /// Every chair tagged with its room index.
    pub fn chairs(&self) -> Vec<(u32, Point2D)> {
        self.rooms
            .iter()
            .enumerate()
            .flat_map(|(i, room)| room.chairs.iter().map(move |c| (i as u32, *c)))
            .collect()
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-stop analysis of a floor plan.
//!
//! [`FloorAnalyzer::new`] builds the meshes and the floor graph once; every
//! query afterwards reads them without mutation, so an analyzer can be
//! shared across threads.

use floorspace_geometry::{Point2D, VisibilityPolygon};
use floorspace_topology::{
    floor_graph, room_graph, FloorGraph, Graph, Mesh, NodeId, Path, PathPlanner,
};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::movement::movement_density;
use crate::plan::FloorPlan;
use crate::privacy::privacy_scores;
use crate::scores::ScoreMap;
use crate::viewpoint::viewpoint;

#[derive(Debug, Clone)]
pub struct FloorAnalyzer {
    plan: FloorPlan,
    config: EngineConfig,
    meshes: Vec<Mesh>,
    floor: FloorGraph,
}

impl FloorAnalyzer {
    /// Validates the inputs and builds the per-room meshes and the floor
    /// graph.
    pub fn new(plan: FloorPlan, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        plan.validate()?;

        let meshes = plan.meshes(&config.mesh)?;
        let floor = floor_graph(&meshes, &plan.doors, &plan.chairs(), &config.graph);
        tracing::info!(
            rooms = plan.rooms.len(),
            samples = meshes.iter().map(Mesh::len).sum::<usize>(),
            nodes = floor.graph.node_count(),
            edges = floor.graph.edge_count(),
            "floor analyzer ready"
        );

        Ok(Self {
            plan,
            config,
            meshes,
            floor,
        })
    }

    pub fn plan(&self) -> &FloorPlan {
        &self.plan
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn floor_graph(&self) -> &FloorGraph {
        &self.floor
    }

    /// Graph of a single room: its lattice and its chairs, no doors.
    pub fn room_graph(&self, room: usize) -> Result<Graph> {
        let chairs = &self.plan.room(room)?.chairs;
        Ok(room_graph(&self.meshes[room], chairs))
    }

    pub fn movement(&self) -> ScoreMap {
        movement_density(&self.floor, &self.config.movement)
    }

    pub fn privacy(&self) -> Result<ScoreMap> {
        privacy_scores(
            &self.plan,
            &self.meshes,
            &self.config.visibility,
            &self.config.privacy,
        )
    }

    pub fn viewpoint(&self, point: Point2D) -> Result<Option<VisibilityPolygon>> {
        viewpoint(&self.plan, point, &self.config.visibility)
    }

    /// Shortest walk between two nodes of the floor graph.
    pub fn shortest_path(&self, start: &NodeId, goal: &NodeId) -> Option<Path> {
        floorspace_topology::shortest_path(&self.floor.graph, start, goal)
    }

    /// Planner over the floor graph for many searches sharing goals.
    pub fn planner(&self) -> PathPlanner<'_> {
        PathPlanner::new(&self.floor.graph)
    }
}

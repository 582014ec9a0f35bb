// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorspace Topology
//!
//! Lattice meshes, navigation graphs and A* pathfinding for floor plans.
//!
//! A room is sampled into a [`Mesh`] of lattice points; meshes, doors and
//! chairs are wired into an immutable [`Graph`]; searches over that graph
//! share per-goal [`Heuristics`] tables. Nothing here mutates a mesh or graph
//! once built, so every query can run concurrently over `&` references.

pub mod builders;
pub mod error;
pub mod graph;
pub mod keys;
pub mod mesh;
pub mod pathfinding;
pub mod serialization;
pub mod spatial;

pub use builders::{floor_graph, room_graph, FloorGraph, FloorGraphConfig};
pub use error::{Error, Result};
pub use graph::{Graph, GraphBuilder, GraphNode};
pub use keys::{ChairId, DoorId, LatticeId, MidpointId, NodeId, NodeKind};
pub use mesh::{Mesh, MeshConfig};
pub use pathfinding::{search, shortest_path, Heuristics, Path, PathPlanner, PathStep};
pub use serialization::{EdgeSnapshot, GraphSnapshot, MeshPointSnapshot, MeshSnapshot, NodeSnapshot};
pub use spatial::SpatialIndex;

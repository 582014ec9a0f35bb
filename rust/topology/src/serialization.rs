// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON serialization for meshes and graphs.
//!
//! Snapshots are plain serde types so request layers can hand engine
//! outputs to non-Rust consumers unchanged.

use floorspace_geometry::Point2D;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::{Graph, GraphBuilder};
use crate::keys::{LatticeId, NodeId};
use crate::mesh::Mesh;

/// Serializable representation of a navigation graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    /// Each undirected edge once, `source < target`.
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub index: usize,
    pub id: NodeId,
    pub position: Point2D,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

/// Serializable representation of a room mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshSnapshot {
    pub room: u32,
    pub interval: f64,
    pub points: Vec<MeshPointSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshPointSnapshot {
    pub col: i32,
    pub row: i32,
    pub position: Point2D,
}

impl Graph {
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self
                .nodes()
                .iter()
                .enumerate()
                .map(|(index, n)| NodeSnapshot {
                    index,
                    id: n.id,
                    position: n.position,
                })
                .collect(),
            edges: self
                .edges()
                .into_iter()
                .map(|(source, target, weight)| EdgeSnapshot {
                    source,
                    target,
                    weight,
                })
                .collect(),
        }
    }

    /// Rebuilds a graph from a snapshot. Node indices are taken from the
    /// snapshot order.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Result<Self> {
        let mut builder = GraphBuilder::new();
        for node in &snapshot.nodes {
            builder.add_node(node.id, node.position);
        }
        for edge in &snapshot.edges {
            let source = node_at(snapshot, edge.source)?;
            let target = node_at(snapshot, edge.target)?;
            builder.connect(&source, &target, edge.weight)?;
        }
        Ok(builder.build())
    }

    /// Serializes the graph to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserializes a graph from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: GraphSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_snapshot(&snapshot)
    }
}

fn node_at(snapshot: &GraphSnapshot, index: usize) -> Result<NodeId> {
    snapshot
        .nodes
        .get(index)
        .map(|n| n.id)
        .ok_or_else(|| Error::Serialization(format!("edge references missing node {}", index)))
}

impl Mesh {
    pub fn to_snapshot(&self) -> MeshSnapshot {
        MeshSnapshot {
            room: self.room(),
            interval: self.interval(),
            points: self
                .iter()
                .map(|(id, p)| MeshPointSnapshot {
                    col: id.col,
                    row: id.row,
                    position: *p,
                })
                .collect(),
        }
    }

    pub fn from_snapshot(snapshot: &MeshSnapshot) -> Self {
        Mesh::from_points(
            snapshot.room,
            snapshot.interval,
            snapshot
                .points
                .iter()
                .map(|p| (LatticeId::new(snapshot.room, p.col, p.row), p.position))
                .collect(),
        )
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: MeshSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(Self::from_snapshot(&snapshot))
    }
}

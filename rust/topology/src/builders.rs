// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Graph Builder - navigation graphs over room meshes.
//!
//! Lattice samples are connected to their right, upper-right, upper-left and
//! upper neighbors; symmetrization supplies the other four directions. Chairs
//! hang off their nearest sample. The floor-wide builder additionally
//! captures doors into every sample within a radius and records a virtual
//! midpoint for every lattice edge.

use floorspace_geometry::Point2D;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::graph::{Graph, GraphBuilder};
use crate::keys::{ChairId, DoorId, LatticeId, MidpointId, NodeId};
use crate::mesh::Mesh;
use crate::spatial::SpatialIndex;

/// Right, upper-right, upper-left, upper.
const LATTICE_NEIGHBORS: [(i32, i32); 4] = [(1, 0), (1, 1), (-1, 1), (0, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorGraphConfig {
    /// Doors connect to every lattice sample at most this far away.
    pub door_capture_radius: f64,
}

impl Default for FloorGraphConfig {
    fn default() -> Self {
        Self {
            door_capture_radius: 500.0,
        }
    }
}

/// Floor-wide graph plus the bookkeeping the analytics need.
#[derive(Debug, Clone)]
pub struct FloorGraph {
    pub graph: Graph,
    /// Virtual nodes halfway along each lattice edge, one per id. Not part
    /// of `graph`.
    pub midpoints: Vec<(MidpointId, Point2D)>,
    /// Every door-to-sample edge, in door order.
    pub door_connections: Vec<(DoorId, LatticeId)>,
    /// Each chair and the sample it hangs off.
    pub chairs: Vec<(ChairId, LatticeId)>,
}

impl FloorGraph {
    /// Doors with at least one connection into `room`, ascending.
    pub fn doors_in_room(&self, room: u32) -> Vec<DoorId> {
        let mut doors: Vec<DoorId> = self
            .door_connections
            .iter()
            .filter(|(_, lattice)| lattice.room == room)
            .map(|(door, _)| *door)
            .collect();
        doors.sort_unstable();
        doors.dedup();
        doors
    }

    pub fn chairs_in_room(&self, room: u32) -> Vec<ChairId> {
        self.chairs
            .iter()
            .filter(|(chair, _)| chair.room == room)
            .map(|(chair, _)| *chair)
            .collect()
    }

    /// Door-to-sample connections grouped by room.
    pub fn doors_by_room(&self) -> FxHashMap<u32, Vec<DoorId>> {
        let mut grouped: FxHashMap<u32, Vec<DoorId>> = FxHashMap::default();
        for (door, lattice) in &self.door_connections {
            let doors = grouped.entry(lattice.room).or_default();
            if !doors.contains(door) {
                doors.push(*door);
            }
        }
        for doors in grouped.values_mut() {
            doors.sort_unstable();
        }
        grouped
    }
}

/// Single-room graph: lattice plus chairs.
pub fn room_graph(mesh: &Mesh, chairs: &[Point2D]) -> Graph {
    let mut builder = GraphBuilder::new();
    add_lattice(&mut builder, mesh, None);
    for (index, chair) in chairs.iter().enumerate() {
        let id = ChairId {
            room: mesh.room(),
            index: index as u32,
        };
        attach_chair(&mut builder, mesh, id, *chair);
    }

    let graph = builder.build();
    tracing::debug!(
        room = mesh.room(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built room graph"
    );
    graph
}

/// Floor-wide graph over several rooms.
///
/// `chairs` are tagged with the room they stand in; a chair whose room has no
/// mesh (or an empty one) is left out.
pub fn floor_graph(
    meshes: &[Mesh],
    doors: &[Point2D],
    chairs: &[(u32, Point2D)],
    config: &FloorGraphConfig,
) -> FloorGraph {
    let mut builder = GraphBuilder::new();
    let mut midpoints = Vec::new();

    for mesh in meshes {
        add_lattice(&mut builder, mesh, Some(&mut midpoints));
    }
    // Crossing diagonals of a lattice square share one midpoint
    let mut seen = FxHashSet::default();
    midpoints.retain(|(id, _)| seen.insert(*id));

    // Doors
    let radius = config.door_capture_radius;
    let index = SpatialIndex::collect_with_cell_size(
        meshes
            .iter()
            .flat_map(|m| m.iter().copied()),
        radius.max(f64::MIN_POSITIVE),
    );
    let mut door_connections = Vec::new();
    for (i, door) in doors.iter().enumerate() {
        let door_id = DoorId(i as u32);
        let door_idx = builder.add_node(door_id.into(), *door);

        let mut captured = index.find_all_near(door, radius);
        captured.sort_unstable();
        if captured.is_empty() {
            tracing::debug!(door = i, "door captured no mesh points");
        }
        for lattice in captured {
            let node_idx = builder.add_node(lattice.into(), Point2D::default());
            builder.link(door_idx, node_idx);
            door_connections.push((door_id, lattice));
        }
    }

    // Chairs
    let by_room: FxHashMap<u32, &Mesh> = meshes.iter().map(|m| (m.room(), m)).collect();
    let mut per_room_count: FxHashMap<u32, u32> = FxHashMap::default();
    let mut chair_links = Vec::new();
    for &(room, chair) in chairs {
        let count = per_room_count.entry(room).or_insert(0);
        let id = ChairId {
            room,
            index: *count,
        };
        *count += 1;

        match by_room.get(&room) {
            Some(mesh) => {
                if let Some(lattice) = attach_chair(&mut builder, mesh, id, chair) {
                    chair_links.push((id, lattice));
                }
            }
            None => tracing::debug!(room, "chair in a room without a mesh"),
        }
    }

    let graph = builder.build();
    tracing::debug!(
        rooms = meshes.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        midpoints = midpoints.len(),
        door_connections = door_connections.len(),
        "built floor graph"
    );

    FloorGraph {
        graph,
        midpoints,
        door_connections,
        chairs: chair_links,
    }
}

/// Adds every sample of `mesh` and its lattice edges, optionally recording
/// the midpoint of each edge.
fn add_lattice(
    builder: &mut GraphBuilder,
    mesh: &Mesh,
    mut midpoints: Option<&mut Vec<(MidpointId, Point2D)>>,
) {
    let indices: Vec<usize> = mesh
        .iter()
        .map(|&(id, p)| builder.add_node(id.into(), p))
        .collect();

    for (&(id, p), &from) in mesh.iter().zip(&indices) {
        for (dc, dr) in LATTICE_NEIGHBORS {
            let neighbor = id.offset(dc, dr);
            let Some(q) = mesh.get(&neighbor) else {
                continue;
            };
            let to = builder.add_node(neighbor.into(), q);
            builder.link(from, to);

            if let Some(midpoints) = midpoints.as_deref_mut() {
                if let Some(mid) = MidpointId::between(id, neighbor) {
                    midpoints.push((mid, p.midpoint(&q)));
                }
            }
        }
    }
}

/// Connects a chair to its nearest sample. Returns that sample, or `None`
/// when the mesh is empty.
fn attach_chair(
    builder: &mut GraphBuilder,
    mesh: &Mesh,
    id: ChairId,
    position: Point2D,
) -> Option<LatticeId> {
    let Some((nearest, p)) = mesh.find_closest(&position) else {
        tracing::debug!(room = mesh.room(), chair = id.index, "no mesh to attach chair to");
        return None;
    };
    let chair_idx = builder.add_node(NodeId::Chair(id), position);
    let node_idx = builder.add_node(nearest.into(), p);
    builder.link(chair_idx, node_idx);
    Some(nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// `n` x `n` lattice with the given spacing, origin at `(x0, y0)`.
    fn grid_mesh(room: u32, n: i32, spacing: f64, x0: f64, y0: f64) -> Mesh {
        let mut points = Vec::new();
        for row in 0..n {
            for col in 0..n {
                points.push((
                    LatticeId::new(room, col, row),
                    Point2D::new(x0 + col as f64 * spacing, y0 + row as f64 * spacing),
                ));
            }
        }
        Mesh::from_points(room, spacing, points)
    }

    fn lattice(room: u32, col: i32, row: i32) -> NodeId {
        LatticeId::new(room, col, row).into()
    }

    #[test]
    fn test_room_graph_connects_eight_neighbors() {
        let mesh = grid_mesh(0, 3, 100.0, 0.0, 0.0);
        let g = room_graph(&mesh, &[]);

        assert_eq!(g.node_count(), 9);
        // 6 horizontal + 6 vertical + 4 + 4 diagonal
        assert_eq!(g.edge_count(), 20);
        assert!(g.is_symmetric());

        let center = g.node_index(&lattice(0, 1, 1)).unwrap();
        assert_eq!(g.degree(center), 8);

        let corner = g.node_index(&lattice(0, 0, 0)).unwrap();
        let diag = g.node_index(&lattice(0, 1, 1)).unwrap();
        let right = g.node_index(&lattice(0, 1, 0)).unwrap();
        assert_relative_eq!(g.weight(corner, diag).unwrap(), 100.0 * 2f64.sqrt());
        assert_relative_eq!(g.weight(corner, right).unwrap(), 100.0);
    }

    #[test]
    fn test_room_graph_skips_pruned_neighbors() {
        let mut points: Vec<_> = grid_mesh(0, 3, 100.0, 0.0, 0.0).iter().copied().collect();
        points.retain(|(id, _)| *id != LatticeId::new(0, 1, 1));
        let mesh = Mesh::from_points(0, 100.0, points);
        let g = room_graph(&mesh, &[]);
        // Every edge through the centre is gone
        assert_eq!(g.edge_count(), 12);
        assert!(g.node_index(&lattice(0, 1, 1)).is_none());
    }

    #[test]
    fn test_chair_attaches_to_nearest_sample() {
        let mesh = grid_mesh(4, 3, 100.0, 0.0, 0.0);
        let g = room_graph(&mesh, &[Point2D::new(190.0, 210.0)]);
        let chair: NodeId = ChairId { room: 4, index: 0 }.into();
        let conns = g.connections(&chair);
        assert_eq!(conns.len(), 1);
        assert_eq!(conns[0].0, lattice(4, 2, 2));
        assert_relative_eq!(conns[0].1, (100.0f64 + 100.0).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_floor_graph_records_midpoints() {
        let mesh = grid_mesh(0, 3, 100.0, 0.0, 0.0);
        let floor = floor_graph(&[mesh], &[], &[], &FloorGraphConfig::default());

        // 12 axial edges plus one shared centre per square
        assert_eq!(floor.graph.edge_count(), 20);
        assert_eq!(floor.midpoints.len(), 16);
        let unique: FxHashSet<MidpointId> = floor.midpoints.iter().map(|(id, _)| *id).collect();
        assert_eq!(unique.len(), floor.midpoints.len());
        let diag = MidpointId::between(LatticeId::new(0, 0, 0), LatticeId::new(0, 1, 1)).unwrap();
        let (_, p) = floor
            .midpoints
            .iter()
            .find(|(id, _)| *id == diag)
            .copied()
            .unwrap();
        assert_eq!(p, Point2D::new(50.0, 50.0));
        // Midpoints are not traversable
        assert!(!floor.graph.contains(&NodeId::Midpoint(diag)));
    }

    #[test]
    fn test_door_captures_all_samples_in_radius() {
        let left = grid_mesh(0, 1, 500.0, 500.0, 500.0);
        let right = grid_mesh(1, 1, 500.0, 1500.0, 500.0);
        let floor = floor_graph(
            &[left, right],
            &[Point2D::new(1000.0, 500.0)],
            &[],
            &FloorGraphConfig::default(),
        );

        // Both samples sit exactly on the capture radius
        assert_eq!(
            floor.door_connections,
            vec![
                (DoorId(0), LatticeId::new(0, 0, 0)),
                (DoorId(0), LatticeId::new(1, 0, 0)),
            ]
        );
        assert_eq!(floor.doors_in_room(0), vec![DoorId(0)]);
        assert_eq!(floor.doors_in_room(1), vec![DoorId(0)]);
        assert!(floor.doors_in_room(2).is_empty());
        assert_eq!(floor.doors_by_room().len(), 2);
        assert!(floor.graph.is_symmetric());
    }

    #[test]
    fn test_door_outside_radius_stays_isolated() {
        let mesh = grid_mesh(0, 2, 100.0, 0.0, 0.0);
        let floor = floor_graph(
            &[mesh],
            &[Point2D::new(5000.0, 5000.0)],
            &[],
            &FloorGraphConfig::default(),
        );
        let door = floor.graph.node_index(&DoorId(0).into()).unwrap();
        assert_eq!(floor.graph.degree(door), 0);
        assert!(floor.door_connections.is_empty());
    }

    #[test]
    fn test_chairs_are_numbered_per_room() {
        let a = grid_mesh(0, 2, 100.0, 0.0, 0.0);
        let b = grid_mesh(1, 2, 100.0, 1000.0, 0.0);
        let floor = floor_graph(
            &[a, b],
            &[],
            &[
                (0, Point2D::new(10.0, 10.0)),
                (1, Point2D::new(1010.0, 10.0)),
                (0, Point2D::new(90.0, 90.0)),
                (7, Point2D::new(0.0, 0.0)),
            ],
            &FloorGraphConfig::default(),
        );

        assert_eq!(
            floor.chairs_in_room(0),
            vec![ChairId { room: 0, index: 0 }, ChairId { room: 0, index: 1 }]
        );
        assert_eq!(floor.chairs_in_room(1), vec![ChairId { room: 1, index: 0 }]);
        // Room 7 has no mesh
        assert!(floor.chairs_in_room(7).is_empty());
        assert_eq!(floor.chairs.len(), 3);
        assert_eq!(floor.chairs[2].1, LatticeId::new(0, 1, 1));
    }
}

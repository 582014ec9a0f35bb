// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Movement density.
//!
//! Within each room, every door is walked to every other door and every
//! chair is walked to every door. Each node strictly inside a walked path
//! gains the pair's weight. Midpoint nodes take the mean of the lattice
//! samples around them.
//!
//! Searches towards one goal form a batch that shares one heuristic table.
//! Batches are independent and run on the rayon pool.

use floorspace_topology::{search, FloorGraph, Graph, Heuristics, NodeId};
use rayon::prelude::*;

use crate::config::MovementConfig;
use crate::scores::ScoreMap;

/// All searches of one room towards one door.
#[derive(Debug, Clone)]
struct GoalBatch {
    room: u32,
    goal: NodeId,
    starts: Vec<(NodeId, f64)>,
}

/// Normalized movement density over every graph node and midpoint.
pub fn movement_density(floor: &FloorGraph, config: &MovementConfig) -> ScoreMap {
    let graph = &floor.graph;
    let batches = goal_batches(floor, config);
    let _span = tracing::info_span!(
        "movement",
        nodes = graph.node_count(),
        batches = batches.len()
    )
    .entered();

    let increments: Vec<Vec<(usize, f64)>> = batches
        .par_iter()
        .map(|batch| run_batch(graph, batch))
        .collect();

    let mut counters = vec![0.0; graph.node_count()];
    for (node, weight) in increments.into_iter().flatten() {
        counters[node] += weight;
    }

    let midpoints = floor.midpoints.iter().map(|(mid, position)| {
        let around: Vec<f64> = mid
            .lattice_neighbors()
            .into_iter()
            .filter_map(|lattice| graph.node_index(&lattice.into()))
            .map(|i| counters[i])
            .collect();
        let mean = if around.is_empty() {
            0.0
        } else {
            around.iter().sum::<f64>() / around.len() as f64
        };
        (NodeId::Midpoint(*mid), *position, mean)
    });

    let nodes = graph
        .nodes()
        .iter()
        .zip(&counters)
        .map(|(node, &count)| (node.id, node.position, count));

    let scores = ScoreMap::from_counters(nodes.chain(midpoints));
    tracing::debug!(scored = scores.len(), "movement pass finished");
    scores
}

fn goal_batches(floor: &FloorGraph, config: &MovementConfig) -> Vec<GoalBatch> {
    let mut rooms: Vec<u32> = floor
        .door_connections
        .iter()
        .map(|(_, lattice)| lattice.room)
        .chain(floor.chairs.iter().map(|(chair, _)| chair.room))
        .collect();
    rooms.sort_unstable();
    rooms.dedup();

    let mut batches = Vec::new();
    for room in rooms {
        let doors = floor.doors_in_room(room);
        let chairs = floor.chairs_in_room(room);
        if doors.is_empty() {
            tracing::debug!(room, chairs = chairs.len(), "room has no doors, skipping");
            continue;
        }

        for (i, goal) in doors.iter().enumerate() {
            let starts = doors[i + 1..]
                .iter()
                .map(|&door| (NodeId::Door(door), config.door_weight))
                .chain(chairs.iter().map(|&chair| (NodeId::Chair(chair), config.chair_weight)))
                .collect::<Vec<_>>();
            if !starts.is_empty() {
                batches.push(GoalBatch {
                    room,
                    goal: NodeId::Door(*goal),
                    starts,
                });
            }
        }
    }
    batches
}

/// Counter increments produced by one batch, as `(node index, weight)`.
fn run_batch(graph: &Graph, batch: &GoalBatch) -> Vec<(usize, f64)> {
    let Some(heuristics) = Heuristics::for_goal(graph, &batch.goal) else {
        return Vec::new();
    };

    let mut increments = Vec::new();
    for (start, weight) in &batch.starts {
        match search(graph, &heuristics, start, &batch.goal) {
            Some(path) => increments.extend(
                path.interior()
                    .iter()
                    .filter_map(|step| graph.node_index(&step.node))
                    .map(|node| (node, *weight)),
            ),
            None => tracing::debug!(
                room = batch.room,
                start = %start,
                goal = %batch.goal,
                "no path, skipping pair"
            ),
        }
    }
    increments
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use floorspace_geometry::Point2D;
    use floorspace_topology::{floor_graph, FloorGraphConfig, LatticeId, Mesh, MidpointId};

    fn lattice(col: i32) -> NodeId {
        LatticeId::new(0, col, 0).into()
    }

    fn row_mesh(xs: &[f64]) -> Mesh {
        let points = xs
            .iter()
            .enumerate()
            .map(|(col, &x)| (LatticeId::new(0, col as i32, 0), Point2D::new(x, 500.0)))
            .collect();
        Mesh::from_points(0, 500.0, points)
    }

    /// Three samples in a row, a door at each end, a chair above the middle.
    fn corridor() -> FloorGraph {
        floor_graph(
            &[row_mesh(&[500.0, 1000.0, 1500.0])],
            &[Point2D::new(0.0, 500.0), Point2D::new(2000.0, 500.0)],
            &[(0, Point2D::new(1000.0, 900.0))],
            &FloorGraphConfig::default(),
        )
    }

    #[test]
    fn test_counts_door_and_chair_traffic() {
        let scores = movement_density(&corridor(), &MovementConfig::default());

        let count = |id: NodeId| scores.get(&id).map(|e| e.count);
        assert_eq!(count(lattice(0)), Some(1.25));
        assert_eq!(count(lattice(1)), Some(1.5));
        assert_eq!(count(lattice(2)), Some(1.25));

        assert_eq!(scores.value(&lattice(1)), Some(1.0));
        assert_relative_eq!(scores.value(&lattice(0)).unwrap(), 1.25 / 1.5);
        assert_eq!(scores.max_value(), Some(1.0));
        assert!(scores.min_value().unwrap() >= 0.0);
    }

    #[test]
    fn test_midpoints_average_their_neighbors() {
        let scores = movement_density(&corridor(), &MovementConfig::default());
        let mid = NodeId::Midpoint(MidpointId {
            room: 0,
            col2: 1,
            row2: 0,
        });
        let entry = scores.get(&mid).unwrap();
        assert_eq!(entry.count, (1.25 + 1.5) / 2.0);
        assert_eq!(entry.position, Point2D::new(750.0, 500.0));
    }

    #[test]
    fn test_weights_come_from_config() {
        let config = MovementConfig {
            door_weight: 0.0,
            chair_weight: 1.0,
        };
        let scores = movement_density(&corridor(), &config);
        let count = |id: NodeId| scores.get(&id).map(|e| e.count);
        assert_eq!(count(lattice(0)), Some(1.0));
        assert_eq!(count(lattice(1)), Some(2.0));
        assert_eq!(count(lattice(2)), Some(1.0));
    }

    #[test]
    fn test_unreachable_pairs_are_skipped() {
        // Two samples too far apart to be lattice neighbors
        let mesh = Mesh::from_points(
            0,
            500.0,
            vec![
                (LatticeId::new(0, 0, 0), Point2D::new(500.0, 500.0)),
                (LatticeId::new(0, 5, 0), Point2D::new(5000.0, 500.0)),
            ],
        );
        let floor = floor_graph(
            &[mesh],
            &[Point2D::new(0.0, 500.0), Point2D::new(5500.0, 500.0)],
            &[],
            &FloorGraphConfig::default(),
        );
        assert_eq!(floor.doors_in_room(0).len(), 2);

        let scores = movement_density(&floor, &MovementConfig::default());
        assert_eq!(scores.len(), floor.graph.node_count());
        assert!(scores.entries().iter().all(|e| e.value == 0.0));
    }

    #[test]
    fn test_doorless_room_scores_zero() {
        let floor = floor_graph(
            &[row_mesh(&[500.0, 1000.0])],
            &[],
            &[(0, Point2D::new(500.0, 600.0))],
            &FloorGraphConfig::default(),
        );
        let scores = movement_density(&floor, &MovementConfig::default());
        assert_eq!(scores.max_value(), Some(0.0));
    }

    #[test]
    fn test_shared_diagonal_midpoint_scored_once() {
        let points = vec![
            (LatticeId::new(0, 0, 0), Point2D::new(500.0, 500.0)),
            (LatticeId::new(0, 1, 0), Point2D::new(1000.0, 500.0)),
            (LatticeId::new(0, 0, 1), Point2D::new(500.0, 1000.0)),
            (LatticeId::new(0, 1, 1), Point2D::new(1000.0, 1000.0)),
        ];
        let floor = floor_graph(
            &[Mesh::from_points(0, 500.0, points)],
            &[Point2D::new(0.0, 500.0)],
            &[(0, Point2D::new(1100.0, 1100.0))],
            &FloorGraphConfig::default(),
        );
        assert_eq!(floor.midpoints.len(), 5);

        let scores = movement_density(&floor, &MovementConfig::default());
        let mut ids: Vec<NodeId> = scores
            .entries()
            .iter()
            .map(|e| e.id)
            .filter(|id| matches!(id, NodeId::Midpoint(_)))
            .collect();
        assert_eq!(ids.len(), 5);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);

        let centre = NodeId::Midpoint(MidpointId {
            room: 0,
            col2: 1,
            row2: 1,
        });
        assert_eq!(scores.get(&centre).map(|e| e.position), Some(Point2D::new(750.0, 750.0)));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pathfinding Engine - A* over navigation graphs.
//!
//! The heuristic is the straight-line distance to the goal. Every edge weight
//! is the Euclidean length of the edge, so the heuristic is admissible and
//! consistent. Heuristic tables are computed once per goal and shared by all
//! searches towards that goal.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::keys::NodeId;

/// Straight-line distance from every node to one goal.
#[derive(Debug, Clone)]
pub struct Heuristics {
    goal: usize,
    estimates: Vec<f64>,
}

impl Heuristics {
    /// Table for `goal`, or `None` if the goal is not in the graph.
    pub fn for_goal(graph: &Graph, goal: &NodeId) -> Option<Self> {
        graph
            .node_index(goal)
            .map(|goal| Self::for_index(graph, goal))
    }

    fn for_index(graph: &Graph, goal: usize) -> Self {
        let target = graph.position(goal);
        let estimates = graph
            .nodes()
            .iter()
            .map(|n| n.position.distance_to(&target))
            .collect();
        Self { goal, estimates }
    }

    /// Graph index of the goal this table targets.
    pub fn goal(&self) -> usize {
        self.goal
    }

    pub fn estimate(&self, node: usize) -> f64 {
        self.estimates[node]
    }
}

/// One node of a path with the distance travelled to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub node: NodeId,
    pub distance: f64,
}

/// Ordered steps from start to goal; the first step has distance 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub steps: Vec<PathStep>,
}

impl Path {
    pub fn total_distance(&self) -> f64 {
        self.steps.last().map_or(0.0, |s| s.distance)
    }

    /// Steps strictly between start and goal.
    pub fn interior(&self) -> &[PathStep] {
        if self.steps.len() <= 2 {
            &[]
        } else {
            &self.steps[1..self.steps.len() - 1]
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.steps.iter().map(|s| s.node)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A* from `start` to `goal`.
///
/// Returns `None` when either node is missing from the graph or the goal is
/// unreachable. A table built for a different goal is ignored and a fresh
/// one computed.
pub fn search(graph: &Graph, heuristics: &Heuristics, start: &NodeId, goal: &NodeId) -> Option<Path> {
    let start_idx = graph.node_index(start)?;
    let goal_idx = graph.node_index(goal)?;

    if heuristics.goal == goal_idx {
        search_indices(graph, heuristics, start_idx, goal_idx)
    } else {
        let fresh = Heuristics::for_index(graph, goal_idx);
        search_indices(graph, &fresh, start_idx, goal_idx)
    }
}

/// One-off search that builds its own heuristic table.
pub fn shortest_path(graph: &Graph, start: &NodeId, goal: &NodeId) -> Option<Path> {
    let heuristics = Heuristics::for_goal(graph, goal)?;
    search(graph, &heuristics, start, goal)
}

fn search_indices(graph: &Graph, heuristics: &Heuristics, start: usize, goal: usize) -> Option<Path> {
    let n = graph.node_count();
    let mut g_score = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut closed = vec![false; n];
    let mut open = BinaryHeap::new();

    g_score[start] = 0.0;
    open.push(AStarState {
        f: heuristics.estimate(start),
        g: 0.0,
        node: start,
    });

    while let Some(AStarState { g, node, .. }) = open.pop() {
        if node == goal {
            break;
        }
        if closed[node] || g > g_score[node] {
            continue;
        }
        closed[node] = true;

        for &(neighbor, weight) in graph.neighbors(node) {
            if closed[neighbor] {
                continue;
            }
            let tentative = g + weight;
            if tentative < g_score[neighbor] {
                g_score[neighbor] = tentative;
                prev[neighbor] = Some(node);
                open.push(AStarState {
                    f: tentative + heuristics.estimate(neighbor),
                    g: tentative,
                    node: neighbor,
                });
            }
        }
    }

    if g_score[goal].is_infinite() {
        return None;
    }

    // Reconstruct path
    let mut indices = vec![goal];
    let mut current = goal;
    while let Some(p) = prev[current] {
        indices.push(p);
        current = p;
    }
    indices.reverse();

    let steps = indices
        .into_iter()
        .map(|i| PathStep {
            node: graph.id(i),
            distance: g_score[i],
        })
        .collect();
    Some(Path { steps })
}

/// Caches heuristic tables per goal across many searches on one graph.
#[derive(Debug)]
pub struct PathPlanner<'g> {
    graph: &'g Graph,
    tables: FxHashMap<usize, Heuristics>,
}

impl<'g> PathPlanner<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            tables: FxHashMap::default(),
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn shortest_path(&mut self, start: &NodeId, goal: &NodeId) -> Option<Path> {
        let goal_idx = self.graph.node_index(goal)?;
        let graph = self.graph;
        let table = self
            .tables
            .entry(goal_idx)
            .or_insert_with(|| Heuristics::for_index(graph, goal_idx));
        search(graph, table, start, goal)
    }

    /// Number of cached goal tables.
    pub fn cached_goals(&self) -> usize {
        self.tables.len()
    }
}

/// Internal state for the A* open set (min-heap by `f`, then node index).
#[derive(Debug, Clone, PartialEq)]
struct AStarState {
    f: f64,
    g: f64,
    node: usize,
}

impl Eq for AStarState {}

impl PartialOrd for AStarState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AStarState {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap; lower index wins ties
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.node.cmp(&self.node))
    }
}

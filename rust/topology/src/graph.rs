// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Weighted navigation graph.
//!
//! A [`GraphBuilder`] collects nodes and directed connections; [`GraphBuilder::build`]
//! symmetrizes them into an immutable [`Graph`]. After building, every edge
//! `(u, v, w)` has a twin `(v, u, w)`.
//!
//! - **Nodes** = lattice samples, doors and chairs, each with a plan position
//! - **Edges** = walkable connections weighted by Euclidean length

use floorspace_geometry::Point2D;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::keys::NodeId;

/// A node in the navigation graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    pub position: Point2D,
}

/// Accumulates nodes and directed edges before symmetrization.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<GraphNode>,
    key_to_node: FxHashMap<NodeId, usize>,
    directed: Vec<(usize, usize, f64)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, or returns the index of the existing node with this id.
    /// The first position given for an id wins.
    pub fn add_node(&mut self, id: NodeId, position: Point2D) -> usize {
        if let Some(&idx) = self.key_to_node.get(&id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.key_to_node.insert(id, idx);
        self.nodes.push(GraphNode { id, position });
        idx
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.key_to_node.contains_key(id)
    }

    pub fn position(&self, id: &NodeId) -> Option<Point2D> {
        self.key_to_node.get(id).map(|&i| self.nodes[i].position)
    }

    /// Records a directed edge `from -> to`.
    pub fn connect(&mut self, from: &NodeId, to: &NodeId, weight: f64) -> Result<()> {
        let a = self.index_of(from)?;
        let b = self.index_of(to)?;
        self.directed.push((a, b, weight));
        Ok(())
    }

    /// Records a directed edge weighted by the distance between the two nodes.
    pub fn connect_euclidean(&mut self, from: &NodeId, to: &NodeId) -> Result<f64> {
        let a = self.index_of(from)?;
        let b = self.index_of(to)?;
        let weight = self.nodes[a].position.distance_to(&self.nodes[b].position);
        self.directed.push((a, b, weight));
        Ok(weight)
    }

    /// Records a directed Euclidean edge between two node indices returned by
    /// [`add_node`](Self::add_node).
    pub(crate) fn link(&mut self, a: usize, b: usize) -> f64 {
        let weight = self.nodes[a].position.distance_to(&self.nodes[b].position);
        self.directed.push((a, b, weight));
        weight
    }

    /// Symmetrizes the recorded edges into an immutable graph.
    ///
    /// An edge recorded in both directions with different weights keeps the
    /// smaller one. Self-loops are dropped. Neighbor lists are sorted by node
    /// index.
    pub fn build(self) -> Graph {
        let mut undirected: FxHashMap<(usize, usize), f64> = FxHashMap::default();
        for (a, b, w) in self.directed {
            if a == b {
                continue;
            }
            let key = (a.min(b), a.max(b));
            undirected
                .entry(key)
                .and_modify(|existing| *existing = existing.min(w))
                .or_insert(w);
        }

        let mut adjacency = vec![Vec::new(); self.nodes.len()];
        for (&(a, b), &w) in &undirected {
            adjacency[a].push((b, w));
            adjacency[b].push((a, w));
        }
        for list in &mut adjacency {
            list.sort_by_key(|&(n, _)| n);
        }

        Graph {
            nodes: self.nodes,
            adjacency,
            key_to_node: self.key_to_node,
            edge_count: undirected.len(),
        }
    }

    fn index_of(&self, id: &NodeId) -> Result<usize> {
        self.key_to_node
            .get(id)
            .copied()
            .ok_or(Error::UnknownNode(*id))
    }
}

/// Immutable undirected navigation graph.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    /// Adjacency list: node index → list of (neighbor index, weight).
    adjacency: Vec<Vec<(usize, f64)>>,
    key_to_node: FxHashMap<NodeId, usize>,
    edge_count: usize,
}

impl Graph {
    // =========================================================================
    // Graph accessors
    // =========================================================================

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns the node index for an id.
    pub fn node_index(&self, id: &NodeId) -> Option<usize> {
        self.key_to_node.get(id).copied()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.key_to_node.contains_key(id)
    }

    pub fn node(&self, index: usize) -> &GraphNode {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn id(&self, index: usize) -> NodeId {
        self.nodes[index].id
    }

    pub fn position(&self, index: usize) -> Point2D {
        self.nodes[index].position
    }

    /// Returns the neighbors of a node as (neighbor_index, weight) pairs,
    /// sorted by neighbor index.
    pub fn neighbors(&self, index: usize) -> &[(usize, f64)] {
        &self.adjacency[index]
    }

    /// Returns the degree (number of connections) of a node.
    pub fn degree(&self, index: usize) -> usize {
        self.adjacency[index].len()
    }

    /// Weight of the edge between two node indices, if connected.
    pub fn weight(&self, a: usize, b: usize) -> Option<f64> {
        let list = &self.adjacency[a];
        list.binary_search_by_key(&b, |&(n, _)| n)
            .ok()
            .map(|i| list[i].1)
    }

    /// Neighbor ids and weights of the node with this id.
    pub fn connections(&self, id: &NodeId) -> Vec<(NodeId, f64)> {
        self.node_index(id)
            .map(|i| {
                self.adjacency[i]
                    .iter()
                    .map(|&(n, w)| (self.nodes[n].id, w))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every edge has a twin of equal weight.
    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().enumerate().all(|(a, list)| {
            list.iter()
                .all(|&(b, w)| self.weight(b, a).is_some_and(|back| back == w))
        })
    }

    /// Undirected edges as `(a, b, weight)` with `a < b`, ordered by `a` then `b`.
    pub fn edges(&self) -> Vec<(usize, usize, f64)> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, list)| {
                list.iter()
                    .filter(move |&&(b, _)| a < b)
                    .map(move |&(b, w)| (a, b, w))
            })
            .collect()
    }
}

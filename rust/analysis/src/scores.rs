// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized per-node score maps.

use floorspace_geometry::Point2D;
use floorspace_topology::NodeId;
use serde::{Deserialize, Serialize};

/// One scored node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub id: NodeId,
    pub position: Point2D,
    /// Raw counter before normalization.
    pub count: f64,
    /// `count / max(count)`, in `[0, 1]`.
    pub value: f64,
}

/// Position/value pair as handed to plotting and request layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeValue {
    pub position: Point2D,
    pub value: f64,
}

/// Scores for a set of nodes, normalized by the largest counter.
///
/// A map whose largest counter is zero scores every node zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreMap {
    entries: Vec<ScoreEntry>,
}

impl ScoreMap {
    pub fn from_counters<I>(counters: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, Point2D, f64)>,
    {
        let mut entries: Vec<ScoreEntry> = counters
            .into_iter()
            .map(|(id, position, count)| ScoreEntry {
                id,
                position,
                count,
                value: 0.0,
            })
            .collect();

        let max = entries.iter().map(|e| e.count).fold(0.0_f64, f64::max);
        if max > 0.0 {
            for entry in &mut entries {
                entry.value = entry.count / max;
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &NodeId) -> Option<&ScoreEntry> {
        self.entries.iter().find(|e| e.id == *id)
    }

    pub fn value(&self, id: &NodeId) -> Option<f64> {
        self.get(id).map(|e| e.value)
    }

    pub fn max_value(&self) -> Option<f64> {
        self.entries.iter().map(|e| e.value).reduce(f64::max)
    }

    pub fn min_value(&self) -> Option<f64> {
        self.entries.iter().map(|e| e.value).reduce(f64::min)
    }

    pub fn node_values(&self) -> Vec<NodeValue> {
        self.entries
            .iter()
            .map(|e| NodeValue {
                position: e.position,
                value: e.value,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorspace_topology::{DoorId, LatticeId};

    fn lattice(col: i32) -> NodeId {
        LatticeId::new(0, col, 0).into()
    }

    #[test]
    fn test_normalizes_by_maximum() {
        let scores = ScoreMap::from_counters([
            (lattice(0), Point2D::new(0.0, 0.0), 2.0),
            (lattice(1), Point2D::new(1.0, 0.0), 0.5),
            (DoorId(0).into(), Point2D::new(2.0, 0.0), 0.0),
        ]);
        assert_eq!(scores.len(), 3);
        assert_eq!(scores.max_value(), Some(1.0));
        assert_eq!(scores.min_value(), Some(0.0));
        assert_eq!(scores.value(&lattice(1)), Some(0.25));
        assert_eq!(scores.get(&lattice(0)).map(|e| e.count), Some(2.0));
    }

    #[test]
    fn test_all_zero_counters_stay_zero() {
        let scores = ScoreMap::from_counters([
            (lattice(0), Point2D::new(0.0, 0.0), 0.0),
            (lattice(1), Point2D::new(1.0, 0.0), 0.0),
        ]);
        assert!(scores.entries().iter().all(|e| e.value == 0.0));
    }

    #[test]
    fn test_empty_map() {
        let scores = ScoreMap::from_counters(Vec::new());
        assert!(scores.is_empty());
        assert_eq!(scores.max_value(), None);
        assert!(scores.node_values().is_empty());
    }

    #[test]
    fn test_node_values_serialize_as_position_and_value() {
        let scores = ScoreMap::from_counters([(lattice(0), Point2D::new(3.0, 4.0), 1.0)]);
        let json = serde_json::to_value(scores.node_values()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"position": {"x": 3.0, "y": 4.0}, "value": 1.0}])
        );
    }
}

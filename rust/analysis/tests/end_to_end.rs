// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Whole-floor scenarios through the public API.

use approx::assert_relative_eq;
use floorspace_analysis::{EngineConfig, FloorAnalyzer, FloorPlan};
use floorspace_geometry::Point2D;
use floorspace_topology::{ChairId, DoorId, LatticeId, MeshConfig, NodeId};

const SMALL_ROOM: &str = r#"{
    "rooms": [{
        "boundary": [{"x": 0, "y": 0}, {"x": 1000, "y": 0}, {"x": 1000, "y": 1000}, {"x": 0, "y": 1000}],
        "chairs": [{"x": 500, "y": 900}]
    }],
    "doors": [{"x": 500, "y": 0}]
}"#;

const TWO_ROOMS: &str = r#"{
    "rooms": [
        {
            "label": "office",
            "boundary": [{"x": 0, "y": 0}, {"x": 3600, "y": 0}, {"x": 3600, "y": 3600}, {"x": 0, "y": 3600}],
            "furniture": [{"center": {"x": 1800, "y": 2600}, "width": 1600, "depth": 800, "rotation": 0.2}],
            "columns": [{"center": {"x": 1800, "y": 1400}, "width": 300, "depth": 300}],
            "chairs": [{"x": 1500, "y": 3300}, {"x": 2100, "y": 3300}]
        },
        {
            "label": "meeting",
            "boundary": [{"x": 3600, "y": 0}, {"x": 6300, "y": 0}, {"x": 6300, "y": 3600}, {"x": 3600, "y": 3600}],
            "chairs": [{"x": 4950, "y": 1800}]
        }
    ],
    "doors": [{"x": 3600, "y": 1800}, {"x": 1800, "y": 0}, {"x": 6300, "y": 2695}],
    "walls": [{"start": {"x": 4500, "y": 2800}, "end": {"x": 5500, "y": 2800}}]
}"#;

fn spacing(interval: f64) -> EngineConfig {
    EngineConfig {
        mesh: MeshConfig::with_interval(interval),
        ..EngineConfig::default()
    }
}

#[test]
fn test_door_to_chair_through_single_sample() {
    let plan = FloorPlan::from_json(SMALL_ROOM).unwrap();
    let analyzer = FloorAnalyzer::new(plan, spacing(500.0)).unwrap();

    let mesh = &analyzer.meshes()[0];
    assert_eq!(mesh.len(), 1);
    let sample = LatticeId::new(0, 0, 0);
    assert_eq!(mesh.get(&sample), Some(Point2D::new(500.0, 500.0)));

    let door = NodeId::Door(DoorId(0));
    let chair = NodeId::Chair(ChairId { room: 0, index: 0 });
    let path = analyzer.shortest_path(&door, &chair).unwrap();

    assert_eq!(path.nodes().collect::<Vec<_>>(), vec![door, sample.into(), chair]);
    assert_relative_eq!(path.steps[1].distance, 500.0);
    assert_relative_eq!(path.total_distance(), 900.0);
}

#[test]
fn test_single_sample_room_scores() {
    let plan = FloorPlan::from_json(SMALL_ROOM).unwrap();
    let analyzer = FloorAnalyzer::new(plan, spacing(500.0)).unwrap();
    let sample: NodeId = LatticeId::new(0, 0, 0).into();

    let movement = analyzer.movement();
    assert_eq!(movement.get(&sample).map(|e| e.count), Some(0.25));
    assert_eq!(movement.value(&sample), Some(1.0));

    // Nothing else in the room to be seen by
    let privacy = analyzer.privacy().unwrap();
    assert_eq!(privacy.len(), 1);
    assert_eq!(privacy.get(&sample).map(|e| e.count), Some(0.0));
    assert_eq!(privacy.value(&sample), Some(0.0));
}

#[test]
fn test_scores_are_normalized() {
    let plan = FloorPlan::from_json(TWO_ROOMS).unwrap();
    let analyzer = FloorAnalyzer::new(plan, spacing(450.0)).unwrap();

    let movement = analyzer.movement();
    assert!(!movement.is_empty());
    assert_eq!(movement.max_value(), Some(1.0));
    assert!(movement.min_value().unwrap() >= 0.0);

    let privacy = analyzer.privacy().unwrap();
    let samples: usize = analyzer.meshes().iter().map(|m| m.len()).sum();
    assert_eq!(privacy.len(), samples);
    assert_eq!(privacy.max_value(), Some(1.0));
    assert!(privacy.min_value().unwrap() >= 0.0);
}

#[test]
fn test_shared_door_links_both_rooms() {
    let plan = FloorPlan::from_json(TWO_ROOMS).unwrap();
    let analyzer = FloorAnalyzer::new(plan, spacing(450.0)).unwrap();
    let floor = analyzer.floor_graph();

    assert!(floor.graph.is_symmetric());
    assert_eq!(floor.doors_in_room(0), vec![DoorId(0), DoorId(1)]);
    assert_eq!(floor.doors_in_room(1), vec![DoorId(0), DoorId(2)]);

    let office_chair = NodeId::Chair(ChairId { room: 0, index: 0 });
    let meeting_chair = NodeId::Chair(ChairId { room: 1, index: 0 });
    let path = analyzer.shortest_path(&office_chair, &meeting_chair).unwrap();
    assert!(path.nodes().any(|n| n == NodeId::Door(DoorId(0))));
}

#[test]
fn test_viewpoint_uses_rogue_walls_of_its_room() {
    let plan = FloorPlan::from_json(TWO_ROOMS).unwrap();
    let analyzer = FloorAnalyzer::new(plan, EngineConfig::default()).unwrap();

    let view = analyzer.viewpoint(Point2D::new(4950.0, 1000.0)).unwrap().unwrap();
    assert!(view.area() < 2700.0 * 3600.0);
    assert!(!view.contains(&Point2D::new(4950.0, 3400.0)));
    assert!(view.contains(&Point2D::new(6200.0, 3500.0)));
    assert!(view.contains(&Point2D::new(4000.0, 500.0)));

    assert!(analyzer.viewpoint(Point2D::new(-10.0, -10.0)).unwrap().is_none());
}

#[test]
fn test_graph_snapshot_round_trips() {
    let plan = FloorPlan::from_json(TWO_ROOMS).unwrap();
    let analyzer = FloorAnalyzer::new(plan, spacing(450.0)).unwrap();
    let graph = &analyzer.floor_graph().graph;

    let restored = floorspace_topology::Graph::from_json(&graph.to_json().unwrap()).unwrap();
    assert_eq!(restored.node_count(), graph.node_count());
    assert_eq!(restored.edge_count(), graph.edge_count());
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorspace Analysis
//!
//! Floor-level analytics built on the geometry and topology crates:
//!
//! - **Movement density**: how much door-to-door and chair-to-door traffic
//!   passes through each point of the floor.
//! - **Privacy**: how many points of its room can see each point.
//! - **Viewpoints**: the region visible from a single point.
//!
//! Score maps are normalized to `[0, 1]` by their largest counter.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use floorspace_analysis::{EngineConfig, FloorAnalyzer, FloorPlan};
//!
//! let plan = FloorPlan::from_json(&std::fs::read_to_string("plan.json")?)?;
//! let analyzer = FloorAnalyzer::new(plan, EngineConfig::from_env())?;
//! for node in analyzer.movement().node_values() {
//!     println!("{} {} {}", node.position.x, node.position.y, node.value);
//! }
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod movement;
pub mod plan;
pub mod privacy;
pub mod scores;
pub mod viewpoint;

pub use analyzer::FloorAnalyzer;
pub use config::{EngineConfig, MovementConfig, PrivacyConfig};
pub use error::{Error, Result};
pub use movement::movement_density;
pub use plan::{FloorPlan, ObstaclePlan, RoomPlan, WallPlan};
pub use privacy::privacy_scores;
pub use scores::{NodeValue, ScoreEntry, ScoreMap};
pub use viewpoint::viewpoint;

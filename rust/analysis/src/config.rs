// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration.
//!
//! Every tunable constant of the engine lives here. Values come from the
//! defaults, an optional JSON file, and `FLOORSPACE_*` environment variables,
//! in that order of precedence (environment wins).

use std::path::Path;
use std::str::FromStr;

use floorspace_geometry::BisectionConfig;
use floorspace_topology::{FloorGraphConfig, MeshConfig};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Counter increments for the movement pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Added to each interior node of a door-to-door path.
    pub door_weight: f64,
    /// Added to each interior node of a chair-to-door path.
    pub chair_weight: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            door_weight: 1.0,
            chair_weight: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyConfig {
    /// Wall-clock budget for one privacy pass, in milliseconds.
    pub deadline_ms: Option<u64>,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub mesh: MeshConfig,
    pub graph: FloorGraphConfig,
    pub visibility: BisectionConfig,
    pub movement: MovementConfig,
    pub privacy: PrivacyConfig,
    /// Number of worker threads for parallel passes.
    pub worker_threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mesh: MeshConfig::default(),
            graph: FloorGraphConfig::default(),
            visibility: BisectionConfig::default(),
            movement: MovementConfig::default(),
            privacy: PrivacyConfig::default(),
            worker_threads: num_cpus::get(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Overlays `FLOORSPACE_*` values returned by `lookup` onto `self`.
    ///
    /// Values that fail to parse leave the current setting untouched.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, current: f64| parse_or(&lookup, key, current);

        self.mesh.interval = get("FLOORSPACE_MESH_INTERVAL", self.mesh.interval);
        self.mesh.margin = get("FLOORSPACE_MESH_MARGIN", self.mesh.margin);
        self.mesh.fallback_interval = get("FLOORSPACE_FALLBACK_INTERVAL", self.mesh.fallback_interval);
        self.mesh.min_rows = parse_or(&lookup, "FLOORSPACE_MESH_MIN_ROWS", self.mesh.min_rows);
        self.graph.door_capture_radius =
            get("FLOORSPACE_DOOR_CAPTURE_RADIUS", self.graph.door_capture_radius);
        self.visibility.tolerance = get("FLOORSPACE_VISIBILITY_TOLERANCE", self.visibility.tolerance);
        self.visibility.max_iterations = parse_or(
            &lookup,
            "FLOORSPACE_VISIBILITY_MAX_ITERATIONS",
            self.visibility.max_iterations,
        );
        self.movement.door_weight = get("FLOORSPACE_DOOR_WEIGHT", self.movement.door_weight);
        self.movement.chair_weight = get("FLOORSPACE_CHAIR_WEIGHT", self.movement.chair_weight);
        if let Some(ms) = lookup("FLOORSPACE_PRIVACY_DEADLINE_MS") {
            // Empty or "none" clears the deadline
            self.privacy.deadline_ms = ms.trim().parse().ok();
        }
        self.worker_threads = parse_or(&lookup, "FLOORSPACE_WORKER_THREADS", self.worker_threads);
        self
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("mesh.interval", self.mesh.interval),
            ("mesh.fallback_interval", self.mesh.fallback_interval),
            ("graph.door_capture_radius", self.graph.door_capture_radius),
            ("visibility.tolerance", self.visibility.tolerance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!("{} must be positive, got {}", name, value)));
            }
        }

        let non_negative = [
            ("mesh.margin", self.mesh.margin),
            ("movement.door_weight", self.movement.door_weight),
            ("movement.chair_weight", self.movement.chair_weight),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::Config(format!("{} must be non-negative, got {}", name, value)));
            }
        }

        if self.visibility.max_iterations == 0 {
            return Err(Error::Config("visibility.max_iterations must be at least 1".into()));
        }
        if self.worker_threads == 0 {
            return Err(Error::Config("worker_threads must be at least 1".into()));
        }
        Ok(())
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, current: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(current)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Privacy: how many samples of its room can see each sample.
//!
//! Every sample's visibility polygon is computed against its room boundary
//! and the room's occluders; each other sample inside that polygon gains one
//! sighting. A viewpoint never counts itself. Quadratic in the samples per room, so viewpoints are spread
//! over the rayon pool and an optional deadline bounds the whole pass.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use floorspace_geometry::{visibility_polygon, BisectionConfig, Occluder, Point2D};
use floorspace_topology::{LatticeId, Mesh, NodeId};
use rayon::prelude::*;

use crate::config::PrivacyConfig;
use crate::error::{Error, Result};
use crate::plan::FloorPlan;
use crate::scores::ScoreMap;

/// Normalized privacy exposure of every sample in `meshes`.
///
/// `meshes[i]` must be the mesh of room `i` of `plan`.
pub fn privacy_scores(
    plan: &FloorPlan,
    meshes: &[Mesh],
    visibility: &BisectionConfig,
    config: &PrivacyConfig,
) -> Result<ScoreMap> {
    let total: usize = meshes.iter().map(Mesh::len).sum();
    let deadline = config
        .deadline_ms
        .map(|ms| Instant::now() + Duration::from_millis(ms));
    let _span = tracing::info_span!("privacy", rooms = meshes.len(), viewpoints = total).entered();

    let completed = AtomicUsize::new(0);
    let mut counters: Vec<(LatticeId, Point2D, f64)> = Vec::with_capacity(total);
    let mut unconverged = 0usize;

    for mesh in meshes {
        if mesh.is_empty() {
            tracing::debug!(room = mesh.room(), "empty mesh, skipping room");
            continue;
        }
        let room = plan.room(mesh.room() as usize)?;
        let occluders = plan.occluders_for(mesh.room() as usize)?;
        let samples = mesh.as_slice();

        let sightings: Option<Vec<(Vec<usize>, bool)>> = samples
            .par_iter()
            .enumerate()
            .map(|(i, (_, viewpoint))| {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    return None;
                }
                let seen = visible_samples(i, viewpoint, &room.boundary, &occluders, samples, visibility);
                completed.fetch_add(1, Ordering::Relaxed);
                Some(seen)
            })
            .collect();

        let Some(sightings) = sightings else {
            let completed = completed.load(Ordering::Relaxed);
            tracing::warn!(completed, total, "privacy pass exceeded its deadline");
            return Err(Error::DeadlineExceeded { completed, total });
        };

        let mut counts = vec![0.0; samples.len()];
        for (seen, converged) in sightings {
            if !converged {
                unconverged += 1;
            }
            for j in seen {
                counts[j] += 1.0;
            }
        }
        counters.extend(samples.iter().zip(counts).map(|(&(id, p), c)| (id, p, c)));
    }

    if unconverged > 0 {
        tracing::debug!(unconverged, "some visibility polygons are approximate");
    }

    Ok(ScoreMap::from_counters(
        counters
            .into_iter()
            .map(|(id, p, count)| (NodeId::Lattice(id), p, count)),
    ))
}

/// Indices of the samples other than `from` visible from `viewpoint`, and
/// whether the polygon converged.
fn visible_samples(
    from: usize,
    viewpoint: &Point2D,
    boundary: &[Point2D],
    occluders: &[Occluder],
    samples: &[(LatticeId, Point2D)],
    config: &BisectionConfig,
) -> (Vec<usize>, bool) {
    let polygon = visibility_polygon(viewpoint, boundary, occluders, config);
    let seen = samples
        .iter()
        .enumerate()
        .filter(|&(j, (_, p))| j != from && polygon.contains(p))
        .map(|(j, _)| j)
        .collect();
    (seen, polygon.converged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{ObstaclePlan, RoomPlan};
    use floorspace_topology::MeshConfig;

    fn square_plan(size: f64) -> FloorPlan {
        FloorPlan {
            rooms: vec![RoomPlan {
                boundary: vec![
                    Point2D::new(0.0, 0.0),
                    Point2D::new(size, 0.0),
                    Point2D::new(size, size),
                    Point2D::new(0.0, size),
                ],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_open_convex_room_is_uniform() {
        let plan = square_plan(2000.0);
        let meshes = plan.meshes(&MeshConfig::with_interval(500.0)).unwrap();
        let n = meshes[0].len();
        assert!(n > 1);

        let scores =
            privacy_scores(&plan, &meshes, &BisectionConfig::default(), &PrivacyConfig::default())
                .unwrap();
        assert_eq!(scores.len(), n);
        for entry in scores.entries() {
            assert_eq!(entry.count, (n - 1) as f64);
            assert_eq!(entry.value, 1.0);
        }
    }

    #[test]
    fn test_column_hides_samples_behind_it() {
        let mut plan = square_plan(3000.0);
        plan.rooms[0].columns.push(ObstaclePlan::Placement {
            center: Point2D::new(1500.0, 1500.0),
            width: 600.0,
            depth: 600.0,
            rotation: 0.0,
        });
        let meshes = plan.meshes(&MeshConfig::with_interval(500.0)).unwrap();
        let n = meshes[0].len();

        let scores =
            privacy_scores(&plan, &meshes, &BisectionConfig::default(), &PrivacyConfig::default())
                .unwrap();
        assert_eq!(scores.max_value(), Some(1.0));
        assert!(scores.min_value().unwrap() >= 0.0);
        assert!(scores.entries().iter().any(|e| e.count < (n - 1) as f64));
    }

    #[test]
    fn test_zero_deadline_fails_fast() {
        let plan = square_plan(3000.0);
        let meshes = plan.meshes(&MeshConfig::with_interval(300.0)).unwrap();
        let config = PrivacyConfig {
            deadline_ms: Some(0),
        };
        let result = privacy_scores(&plan, &meshes, &BisectionConfig::default(), &config);
        assert!(matches!(
            result,
            Err(Error::DeadlineExceeded { total, .. }) if total == meshes[0].len()
        ));
    }

    #[test]
    fn test_empty_meshes_give_empty_scores() {
        let plan = square_plan(500.0);
        let meshes = plan.meshes(&MeshConfig::default()).unwrap();
        assert!(meshes[0].is_empty());
        let scores =
            privacy_scores(&plan, &meshes, &BisectionConfig::default(), &PrivacyConfig::default())
                .unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_single_sample_sees_no_one() {
        let plan = square_plan(1000.0);
        let meshes = plan.meshes(&MeshConfig::with_interval(500.0)).unwrap();
        assert_eq!(meshes[0].len(), 1);

        let scores =
            privacy_scores(&plan, &meshes, &BisectionConfig::default(), &PrivacyConfig::default())
                .unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.entries()[0].count, 0.0);
        assert_eq!(scores.entries()[0].value, 0.0);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh Generator - lattice sampling of a room.
//!
//! A room's bounding box is split into `floor(extent / interval)` cells per
//! axis; samples sit on the interior cell boundaries of the margin-inset box,
//! so an axis with `cells` cells carries `cells - 1` samples. A room two cells
//! wide gets one centred sample, and one only a single cell wide gets none
//! along that axis. Boundary rows are never sampled. If the
//! lattice has fewer than `min_rows` rows the room is resampled once at the
//! fallback spacing.
//!
//! Pruning returns a new [`Mesh`] with the samples outside the room or inside
//! an obstacle removed. Ids are never renumbered.

use floorspace_geometry::{polygon_bounds, polygon_contains, Point2D};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::keys::LatticeId;

/// Sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Target spacing between samples.
    pub interval: f64,
    /// Inset from each bounding box edge.
    pub margin: f64,
    /// Minimum number of sample rows before falling back.
    pub min_rows: usize,
    /// Spacing for the single retry.
    pub fallback_interval: f64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            interval: 450.0,
            margin: 10.0,
            min_rows: 6,
            fallback_interval: 350.0,
        }
    }
}

impl MeshConfig {
    pub fn with_interval(interval: f64) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }
}

/// Lattice samples of one room, in row-major generation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    room: u32,
    interval: f64,
    points: Vec<(LatticeId, Point2D)>,
    index: FxHashMap<LatticeId, usize>,
}

impl Mesh {
    /// Builds a mesh from explicit samples. Later duplicates of an id are
    /// dropped.
    pub fn from_points(room: u32, interval: f64, points: Vec<(LatticeId, Point2D)>) -> Self {
        let mut index = FxHashMap::default();
        let mut unique = Vec::with_capacity(points.len());
        for (id, p) in points {
            if !index.contains_key(&id) {
                index.insert(id, unique.len());
                unique.push((id, p));
            }
        }
        Self {
            room,
            interval,
            points: unique,
            index,
        }
    }

    /// Unpruned lattice over the bounding box of `boundary`.
    pub fn generate(room: u32, boundary: &[Point2D], config: &MeshConfig) -> Result<Self> {
        check_interval(config.interval)?;

        let mut interval = config.interval;
        let mut points = lattice(room, boundary, interval, config.margin);

        if row_count(&points) < config.min_rows {
            check_interval(config.fallback_interval)?;
            tracing::debug!(
                room,
                rows = row_count(&points),
                interval,
                fallback = config.fallback_interval,
                "too few mesh rows, resampling"
            );
            interval = config.fallback_interval;
            points = lattice(room, boundary, interval, config.margin);
        }

        tracing::debug!(room, interval, samples = points.len(), "generated mesh");
        Ok(Self::from_points(room, interval, points))
    }

    /// Generates and prunes in one step.
    pub fn build<O: AsRef<[Point2D]>>(
        room: u32,
        boundary: &[Point2D],
        obstacles: &[O],
        config: &MeshConfig,
    ) -> Result<Self> {
        Ok(Self::generate(room, boundary, config)?.pruned(boundary, obstacles))
    }

    /// Copy of this mesh without the samples that fall outside `boundary` or
    /// inside any obstacle.
    pub fn pruned<O: AsRef<[Point2D]>>(&self, boundary: &[Point2D], obstacles: &[O]) -> Self {
        let points: Vec<_> = self
            .points
            .iter()
            .filter(|(_, p)| {
                polygon_contains(boundary, p)
                    && !obstacles.iter().any(|o| polygon_contains(o.as_ref(), p))
            })
            .copied()
            .collect();

        if points.len() < self.points.len() {
            tracing::trace!(
                room = self.room,
                removed = self.points.len() - points.len(),
                "pruned mesh"
            );
        }
        Self::from_points(self.room, self.interval, points)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn room(&self) -> u32 {
        self.room
    }

    /// Spacing actually used, after any fallback.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: &LatticeId) -> Option<Point2D> {
        self.index.get(id).map(|&i| self.points[i].1)
    }

    pub fn contains(&self, id: &LatticeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(LatticeId, Point2D)> + '_ {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[(LatticeId, Point2D)] {
        &self.points
    }

    pub fn ids(&self) -> impl Iterator<Item = LatticeId> + '_ {
        self.points.iter().map(|(id, _)| *id)
    }

    pub fn positions(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.points.iter().map(|(_, p)| *p)
    }

    /// Distinct rows present.
    pub fn rows(&self) -> usize {
        row_count(&self.points)
    }

    /// Sample closest to `target` by squared distance. Ties go to the sample
    /// generated first.
    pub fn find_closest(&self, target: &Point2D) -> Option<(LatticeId, Point2D)> {
        let mut best: Option<(f64, LatticeId, Point2D)> = None;
        for &(id, p) in &self.points {
            let d = p.distance_squared_to(target);
            if best.map_or(true, |(bd, _, _)| d < bd) {
                best = Some((d, id, p));
            }
        }
        best.map(|(_, id, p)| (id, p))
    }
}

fn check_interval(interval: f64) -> Result<()> {
    if interval.is_finite() && interval > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidInterval(interval))
    }
}

/// Interior cell boundaries of `[min + margin, max - margin]` along one axis.
fn axis_samples(min: f64, max: f64, interval: f64, margin: f64) -> Vec<f64> {
    let cells = ((max - min) / interval).floor();
    if !(cells >= 2.0) {
        return Vec::new();
    }
    let cells = cells as usize;
    let start = min + margin;
    let step = (max - margin - start) / cells as f64;
    (1..cells).map(|k| start + k as f64 * step).collect()
}

fn lattice(room: u32, boundary: &[Point2D], interval: f64, margin: f64) -> Vec<(LatticeId, Point2D)> {
    let Some(bounds) = polygon_bounds(boundary) else {
        return Vec::new();
    };
    let xs = axis_samples(bounds.min.x, bounds.max.x, interval, margin);
    let ys = axis_samples(bounds.min.y, bounds.max.y, interval, margin);

    let mut points = Vec::with_capacity(xs.len() * ys.len());
    for (row, &y) in ys.iter().enumerate() {
        for (col, &x) in xs.iter().enumerate() {
            points.push((LatticeId::new(room, col as i32, row as i32), Point2D::new(x, y)));
        }
    }
    points
}

fn row_count(points: &[(LatticeId, Point2D)]) -> usize {
    let mut rows: Vec<i32> = points.iter().map(|(id, _)| id.row).collect();
    rows.sort_unstable();
    rows.dedup();
    rows.len()
}

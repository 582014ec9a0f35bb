// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial index for radius queries over plan points.
//!
//! Uses a grid-based spatial hash so door capture does not scan every
//! lattice sample of the floor.

use floorspace_geometry::Point2D;
use rustc_hash::FxHashMap;

/// A spatial hash grid over 2D points carrying a `Copy` payload.
///
/// Queries scan the square of cells that can hold a point within the
/// radius: the 3x3 neighborhood when the radius is at most `cell_size`.
#[derive(Debug)]
pub struct SpatialIndex<T> {
    cell_size: f64,
    grid: FxHashMap<(i64, i64), Vec<(T, Point2D)>>,
}

impl<T: Copy> SpatialIndex<T> {
    /// Creates a new spatial index with the given cell size.
    ///
    /// `cell_size` should be close to the radius used for queries.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            grid: FxHashMap::default(),
        }
    }

    /// Builds an index from `(item, position)` pairs.
    pub fn collect_with_cell_size<I: IntoIterator<Item = (T, Point2D)>>(
        iter: I,
        cell_size: f64,
    ) -> Self {
        let mut index = Self::new(cell_size);
        for (item, p) in iter {
            index.insert(item, p);
        }
        index
    }

    pub fn insert(&mut self, item: T, position: Point2D) {
        let cell = self.cell_coords(&position);
        self.grid.entry(cell).or_default().push((item, position));
    }

    /// All items within `radius` of `center`, boundary included.
    ///
    /// Order follows the grid layout, not distance; callers that need a
    /// stable order sort the result.
    pub fn find_all_near(&self, center: &Point2D, radius: f64) -> Vec<T> {
        let (cx, cy) = self.cell_coords(center);
        let reach = ((radius / self.cell_size).ceil() as i64).max(1);
        let radius_sq = radius * radius;
        let mut result = Vec::new();

        for dx in -reach..=reach {
            for dy in -reach..=reach {
                if let Some(items) = self.grid.get(&(cx + dx, cy + dy)) {
                    for (item, p) in items {
                        if p.distance_squared_to(center) <= radius_sq {
                            result.push(*item);
                        }
                    }
                }
            }
        }

        result
    }

    pub fn len(&self) -> usize {
        self.grid.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    fn cell_coords(&self, p: &Point2D) -> (i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Furniture footprints
//!
//! Plan items (desks, cabinets, columns) arrive as a placement: a centre, a
//! width along local x, a depth along local y and a rotation. The footprint
//! is the rotated rectangle those describe.

use crate::error::{Error, Result};
use crate::point::Point2D;
use crate::polygon::{centroid, polygon_contains};
use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub corners: Vec<Point2D>,
}

impl Footprint {
    pub fn new(corners: Vec<Point2D>) -> Self {
        Self { corners }
    }

    /// Rectangle of `width` x `depth` centred on `center`, rotated
    /// counter-clockwise by `rotation` radians.
    ///
    /// Negative extents are taken by magnitude.
    pub fn from_placement(center: Point2D, width: f64, depth: f64, rotation: f64) -> Result<Self> {
        if !center.is_finite() {
            return Err(Error::NonFiniteCoordinate {
                x: center.x,
                y: center.y,
            });
        }
        if !width.is_finite() || !depth.is_finite() || !rotation.is_finite() {
            return Err(Error::InvalidFootprint(format!(
                "width={}, depth={}, rotation={}",
                width, depth, rotation
            )));
        }

        let hw = width.abs() / 2.0;
        let hd = depth.abs() / 2.0;
        let rot = Rotation2::new(rotation);
        let origin = center.to_nalgebra();

        let corners = [(-hw, -hd), (hw, -hd), (hw, hd), (-hw, hd)]
            .into_iter()
            .map(|(dx, dy)| Point2D::from_nalgebra(&(origin + rot * Vector2::new(dx, dy))))
            .collect();

        Ok(Self { corners })
    }

    pub fn contains(&self, point: &Point2D) -> bool {
        polygon_contains(&self.corners, point)
    }

    pub fn centroid(&self) -> Option<Point2D> {
        centroid(&self.corners)
    }

    pub fn as_slice(&self) -> &[Point2D] {
        &self.corners
    }
}

impl AsRef<[Point2D]> for Footprint {
    fn as_ref(&self) -> &[Point2D] {
        &self.corners
    }
}

impl From<Vec<Point2D>> for Footprint {
    fn from(corners: Vec<Point2D>) -> Self {
        Self::new(corners)
    }
}

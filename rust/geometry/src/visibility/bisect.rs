// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::point::Point2D;
use crate::predicates::boundary_intersects_excluding_touch;
use serde::{Deserialize, Serialize};

/// Precision/effort trade-off for shadow transition search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BisectionConfig {
    /// Stop once the blocked/visible bracket is at most this long.
    pub tolerance: f64,
    /// Upper bound on halvings per search.
    pub max_iterations: u32,
}

impl Default for BisectionConfig {
    fn default() -> Self {
        Self {
            tolerance: 10.0,
            max_iterations: 16,
        }
    }
}

/// Outcome of a transition search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisection {
    pub point: Point2D,
    pub converged: bool,
    pub iterations: u32,
}

/// Binary search along `blocked_end`–`open_end` for the point where the
/// sight line from `viewpoint` stops being blocked by `polygon`.
///
/// The bracket always keeps a blocked point at one end and a visible point at
/// the other; the returned point is the bracket midpoint.
pub fn bisect_transition(
    polygon: &[Point2D],
    viewpoint: &Point2D,
    blocked_end: Point2D,
    open_end: Point2D,
    config: &BisectionConfig,
) -> Bisection {
    let mut lo = blocked_end;
    let mut hi = open_end;

    for iteration in 1..=config.max_iterations {
        let mid = lo.midpoint(&hi);
        if boundary_intersects_excluding_touch(polygon, viewpoint, &mid) {
            lo = mid;
        } else {
            hi = mid;
        }
        if lo.distance_to(&hi) <= config.tolerance {
            return Bisection {
                point: lo.midpoint(&hi),
                converged: true,
                iterations: iteration,
            };
        }
    }

    let point = lo.midpoint(&hi);
    tracing::trace!(
        x = point.x,
        y = point.y,
        bracket = lo.distance_to(&hi),
        "bisection did not converge"
    );
    Bisection {
        point,
        converged: false,
        iterations: config.max_iterations,
    }
}

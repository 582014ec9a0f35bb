// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for mesh and graph operations.

use crate::keys::NodeId;

/// Result type alias for topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building meshes and graphs.
///
/// Unreachable goals and empty meshes are not errors; they surface as `None`
/// and empty collections.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Mesh spacing must be finite and strictly positive.
    #[error("invalid mesh interval: {0}")]
    InvalidInterval(f64),

    /// An edge referenced a node that was never added.
    #[error("node not found: {0}")]
    UnknownNode(NodeId),

    /// Invalid geometric input.
    #[error(transparent)]
    Geometry(#[from] floorspace_geometry::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for floor plan analysis.

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during an analysis pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Geometry(#[from] floorspace_geometry::Error),

    #[error(transparent)]
    Topology(#[from] floorspace_topology::Error),

    #[error("room {index} out of range (floor has {count} rooms)")]
    RoomOutOfRange { index: usize, count: usize },

    /// The privacy pass ran past its wall-clock budget.
    #[error("deadline exceeded after {completed} of {total} viewpoints")]
    DeadlineExceeded { completed: usize, total: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

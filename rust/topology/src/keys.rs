// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node identity.
//!
//! Every graph node is addressed by a small `Copy` key instead of a string
//! label. Lattice samples are keyed by room and integer lattice coordinate;
//! anchors (doors, chairs) by their role and index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A lattice sample: room index plus integer `(col, row)` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LatticeId {
    pub room: u32,
    pub col: i32,
    pub row: i32,
}

impl LatticeId {
    pub fn new(room: u32, col: i32, row: i32) -> Self {
        Self { room, col, row }
    }

    /// The id `(dc, dr)` steps away in the same room.
    pub fn offset(&self, dc: i32, dr: i32) -> Self {
        Self {
            room: self.room,
            col: self.col + dc,
            row: self.row + dr,
        }
    }
}

/// A virtual node halfway between two lattice neighbors.
///
/// Stored in doubled lattice coordinates so the half step stays integral:
/// the midpoint of `(1, 2)` and `(2, 3)` is `(3, 5)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MidpointId {
    pub room: u32,
    pub col2: i32,
    pub row2: i32,
}

impl MidpointId {
    /// Midpoint key of two lattice ids in the same room.
    pub fn between(a: LatticeId, b: LatticeId) -> Option<Self> {
        (a.room == b.room).then(|| Self {
            room: a.room,
            col2: a.col + b.col,
            row2: a.row + b.row,
        })
    }

    /// Lattice ids within half a step of this midpoint (up to 8).
    ///
    /// Whether those ids exist in a mesh is up to the caller.
    pub fn lattice_neighbors(&self) -> Vec<LatticeId> {
        const HALF_STEPS: [(i32, i32); 8] = [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ];

        HALF_STEPS
            .iter()
            .map(|&(dc, dr)| (self.col2 + dc, self.row2 + dr))
            .filter(|&(c, r)| c % 2 == 0 && r % 2 == 0)
            .map(|(c, r)| LatticeId::new(self.room, c / 2, r / 2))
            .collect()
    }
}

/// A door anchor. Doors are floor-wide; they belong to whichever rooms they
/// connect into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DoorId(pub u32);

/// A chair anchor, scoped to its room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChairId {
    pub room: u32,
    pub index: u32,
}

/// Any node a navigation graph can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    Lattice(LatticeId),
    Midpoint(MidpointId),
    Door(DoorId),
    Chair(ChairId),
}

impl NodeId {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeId::Lattice(_) => NodeKind::Lattice,
            NodeId::Midpoint(_) => NodeKind::Midpoint,
            NodeId::Door(_) => NodeKind::Door,
            NodeId::Chair(_) => NodeKind::Chair,
        }
    }

    pub fn as_lattice(&self) -> Option<LatticeId> {
        match self {
            NodeId::Lattice(id) => Some(*id),
            _ => None,
        }
    }

    /// Room the node is scoped to. Doors have none.
    pub fn room(&self) -> Option<u32> {
        match self {
            NodeId::Lattice(id) => Some(id.room),
            NodeId::Midpoint(id) => Some(id.room),
            NodeId::Chair(id) => Some(id.room),
            NodeId::Door(_) => None,
        }
    }
}

impl From<LatticeId> for NodeId {
    fn from(id: LatticeId) -> Self {
        NodeId::Lattice(id)
    }
}

impl From<MidpointId> for NodeId {
    fn from(id: MidpointId) -> Self {
        NodeId::Midpoint(id)
    }
}

impl From<DoorId> for NodeId {
    fn from(id: DoorId) -> Self {
        NodeId::Door(id)
    }
}

impl From<ChairId> for NodeId {
    fn from(id: ChairId) -> Self {
        NodeId::Chair(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Lattice(id) => write!(f, "lattice {}:({}, {})", id.room, id.col, id.row),
            NodeId::Midpoint(id) => write!(
                f,
                "midpoint {}:({}, {})",
                id.room,
                id.col2 as f64 / 2.0,
                id.row2 as f64 / 2.0
            ),
            NodeId::Door(id) => write!(f, "door {}", id.0),
            NodeId::Chair(id) => write!(f, "chair {}:{}", id.room, id.index),
        }
    }
}

/// Discriminant for node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Lattice = 0,
    Midpoint = 1,
    Door = 2,
    Chair = 3,
}

impl NodeKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Lattice => "Lattice",
            NodeKind::Midpoint => "Midpoint",
            NodeKind::Door => "Door",
            NodeKind::Chair => "Chair",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Chamber domain model
//!
//! A chamber is one hexagonal cell of a map. It carries static terrain flags
//! (sealed, lighted, treasure) and a mark recording how far the traversal has
//! progressed through it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of neighbour slots around a hexagonal chamber
pub const SIDES: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkError {
    #[error("Invalid mark transition for chamber {id}: {from} -> {to}")]
    InvalidTransition {
        id: ChamberId,
        from: MarkState,
        to: MarkState,
    },

    #[error("Chamber {0} is already marked as the start")]
    AlreadyStarted(ChamberId),
}

/// Index of a chamber inside its map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChamberId(pub(crate) usize);

impl fmt::Display for ChamberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Grid position of a chamber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Traversal mark of a chamber
///
/// Marks only move forward: `Unmarked -> Pushed -> Popped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarkState {
    #[default]
    Unmarked,
    /// Currently on the path stack
    Pushed,
    /// Visited and abandoned
    Popped,
}

impl MarkState {
    /// Returns true if `next` is the one legal successor of this state
    pub fn can_advance_to(self, next: MarkState) -> bool {
        matches!(
            (self, next),
            (MarkState::Unmarked, MarkState::Pushed) | (MarkState::Pushed, MarkState::Popped)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkState::Unmarked => "unmarked",
            MarkState::Pushed => "pushed",
            MarkState::Popped => "popped",
        }
    }
}

impl fmt::Display for MarkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single hexagonal chamber
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chamber {
    coord: Coord,
    sealed: bool,
    lighted: bool,
    treasure: bool,
    start: bool,
    mark: MarkState,

    /// Neighbour slots, clockwise from north-east
    neighbours: [Option<ChamberId>; SIDES],
}

impl Chamber {
    /// Creates an ordinary, unlit chamber with no neighbours
    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            sealed: false,
            lighted: false,
            treasure: false,
            start: false,
            mark: MarkState::Unmarked,
            neighbours: [None; SIDES],
        }
    }

    /// Marks the chamber as sealed
    pub fn sealed(mut self) -> Self {
        self.sealed = true;
        self
    }

    /// Marks the chamber as lighted
    pub fn lighted(mut self) -> Self {
        self.lighted = true;
        self
    }

    /// Marks the chamber as holding a treasure
    pub fn treasure(mut self) -> Self {
        self.treasure = true;
        self
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn is_lighted(&self) -> bool {
        self.lighted
    }

    pub fn is_treasure(&self) -> bool {
        self.treasure
    }

    pub fn is_start(&self) -> bool {
        self.start
    }

    /// Returns true once the chamber has been pushed (or popped)
    pub fn is_marked(&self) -> bool {
        self.mark != MarkState::Unmarked
    }

    pub fn mark_state(&self) -> MarkState {
        self.mark
    }

    /// Returns the neighbour in `slot`, or `None` for an empty or out-of-range slot
    pub fn neighbour(&self, slot: usize) -> Option<ChamberId> {
        self.neighbours.get(slot).copied().flatten()
    }

    /// Iterates the six neighbour slots in order
    pub fn neighbours(&self) -> impl Iterator<Item = Option<ChamberId>> + '_ {
        self.neighbours.iter().copied()
    }

    /// Single-character terrain token for this chamber
    ///
    /// Entrances are a property of the map; see [`HexMap::symbol`](super::HexMap::symbol).
    pub fn symbol(&self) -> char {
        if self.sealed {
            '*'
        } else if self.treasure {
            'T'
        } else if self.lighted {
            'L'
        } else {
            '.'
        }
    }

    pub(crate) fn set_neighbour(&mut self, slot: usize, id: Option<ChamberId>) {
        self.neighbours[slot] = id;
    }

    pub(crate) fn set_start(&mut self, id: ChamberId) -> Result<(), MarkError> {
        if self.start {
            return Err(MarkError::AlreadyStarted(id));
        }
        self.start = true;
        Ok(())
    }

    pub(crate) fn advance_mark(&mut self, id: ChamberId, next: MarkState) -> Result<(), MarkError> {
        if !self.mark.can_advance_to(next) {
            return Err(MarkError::InvalidTransition {
                id,
                from: self.mark,
                to: next,
            });
        }
        self.mark = next;
        Ok(())
    }

    pub(crate) fn clear_marks(&mut self) {
        self.mark = MarkState::Unmarked;
        self.start = false;
    }
}

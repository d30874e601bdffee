//! Domain models for hexpath
//!
//! Contains the map, the path stack and the search itself, without any I/O concerns.

mod chamber;
mod map;
mod path;
mod stack;

pub use chamber::{Chamber, ChamberId, Coord, MarkError, MarkState, SIDES};
pub use map::{opposite, step, BuildError, HexMap, HexMapBuilder};
pub use path::{PathError, PathFinder, PathOutcome, TreasureCounting};
pub use stack::{Iter, LinkedStack, StackError};

//! hexpath - treasure paths through hexagonal chamber maps
//!
//! A map is a grid of hexagonal chambers with one entrance. Some chambers are
//! lighted, some hold treasure and some are sealed. [`PathFinder`] walks the
//! map greedily from the entrance until every treasure is on its route,
//! keeping that route on a [`LinkedStack`].

pub mod cli;
pub mod domain;
pub mod logging;
pub mod storage;

pub use domain::{Chamber, ChamberId, Coord, HexMap, LinkedStack, MarkState, PathFinder, PathOutcome};

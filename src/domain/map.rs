//! Hexagonal chamber map
//!
//! Owns every chamber of a map in an arena addressed by [`ChamberId`].
//! Chambers refer to their neighbours by id, so the map is free of
//! reference cycles and can be marked in place during a traversal.
//!
//! Grid geometry uses pointy-top hexagons with odd rows shifted half a cell
//! to the right. Neighbour slots run clockwise from north-east:
//!
//! ```text
//!        5 NW   0 NE
//!     4 W    (r,c)   1 E
//!        3 SW   2 SE
//! ```

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;
use thiserror::Error;

use super::chamber::{Chamber, ChamberId, Coord, MarkError, MarkState, SIDES};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Map has no entrance")]
    MissingEntrance,

    #[error("Unknown chamber: {0}")]
    UnknownChamber(ChamberId),

    #[error("Invalid neighbour slot {0}: expected 0..6")]
    InvalidSlot(usize),
}

/// Returns the slot on the far side of `slot`
pub fn opposite(slot: usize) -> usize {
    (slot + SIDES / 2) % SIDES
}

/// Returns the grid position one step away through `slot`, if it is not
/// above or left of the origin
pub fn step(coord: Coord, slot: usize) -> Option<Coord> {
    let Coord { row, col } = coord;
    let odd = row % 2 == 1;

    let (row, col) = match slot {
        0 if odd => (row.checked_sub(1)?, col + 1),
        0 => (row.checked_sub(1)?, col),
        1 => (row, col + 1),
        2 if odd => (row + 1, col + 1),
        2 => (row + 1, col),
        3 if odd => (row + 1, col),
        3 => (row + 1, col.checked_sub(1)?),
        4 => (row, col.checked_sub(1)?),
        5 if odd => (row.checked_sub(1)?, col),
        5 => (row.checked_sub(1)?, col.checked_sub(1)?),
        _ => return None,
    };

    Some(Coord::new(row, col))
}

/// Incrementally assembles a [`HexMap`]
#[derive(Debug, Default)]
pub struct HexMapBuilder {
    chambers: Vec<Chamber>,
    entrance: Option<ChamberId>,
}

impl HexMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a chamber and returns its id
    pub fn add(&mut self, chamber: Chamber) -> ChamberId {
        self.chambers.push(chamber);
        ChamberId(self.chambers.len() - 1)
    }

    /// Declares the entrance chamber
    pub fn entrance(&mut self, id: ChamberId) -> Result<&mut Self, BuildError> {
        self.check(id)?;
        self.entrance = Some(id);
        Ok(self)
    }

    /// Connects `from` to `to` through `slot`, and `to` back through the opposite slot
    pub fn link(&mut self, from: ChamberId, slot: usize, to: ChamberId) -> Result<&mut Self, BuildError> {
        if slot >= SIDES {
            return Err(BuildError::InvalidSlot(slot));
        }
        self.check(from)?;
        self.check(to)?;

        self.chambers[from.0].set_neighbour(slot, Some(to));
        self.chambers[to.0].set_neighbour(opposite(slot), Some(from));
        Ok(self)
    }

    /// Links every pair of chambers that are adjacent on the hex grid
    pub fn link_grid(&mut self) -> &mut Self {
        let by_coord: HashMap<Coord, ChamberId> = self
            .chambers
            .iter()
            .enumerate()
            .map(|(i, chamber)| (chamber.coord(), ChamberId(i)))
            .collect();

        for chamber in &mut self.chambers {
            for slot in 0..SIDES {
                let neighbour = step(chamber.coord(), slot).and_then(|c| by_coord.get(&c).copied());
                chamber.set_neighbour(slot, neighbour);
            }
        }
        self
    }

    /// Finishes the map
    pub fn build(self) -> Result<HexMap, BuildError> {
        let entrance = self.entrance.ok_or(BuildError::MissingEntrance)?;
        let treasures = self.chambers.iter().filter(|c| c.is_treasure()).count();

        Ok(HexMap {
            chambers: self.chambers,
            entrance,
            treasures,
        })
    }

    fn check(&self, id: ChamberId) -> Result<(), BuildError> {
        if id.0 < self.chambers.len() {
            Ok(())
        } else {
            Err(BuildError::UnknownChamber(id))
        }
    }
}

/// A map of hexagonal chambers with a single entrance
#[derive(Debug, Clone)]
pub struct HexMap {
    chambers: Vec<Chamber>,
    entrance: ChamberId,
    treasures: usize,
}

impl HexMap {
    pub fn builder() -> HexMapBuilder {
        HexMapBuilder::new()
    }

    pub fn entrance(&self) -> ChamberId {
        self.entrance
    }

    /// Total number of treasure chambers in the map
    pub fn num_treasures(&self) -> usize {
        self.treasures
    }

    /// Number of chambers
    pub fn len(&self) -> usize {
        self.chambers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chambers.is_empty()
    }

    /// Returns a chamber by id
    ///
    /// Ids are only minted by this map's builder, so any id obtained from the
    /// map itself is valid.
    pub fn chamber(&self, id: ChamberId) -> &Chamber {
        &self.chambers[id.0]
    }

    pub fn get(&self, id: ChamberId) -> Option<&Chamber> {
        self.chambers.get(id.0)
    }

    /// Returns the neighbour of `id` in `slot`
    pub fn neighbour(&self, id: ChamberId, slot: usize) -> Option<ChamberId> {
        self.get(id).and_then(|chamber| chamber.neighbour(slot))
    }

    /// Map token for a chamber, `E` for the entrance
    pub fn symbol(&self, id: ChamberId) -> char {
        if id == self.entrance {
            'E'
        } else {
            self.chamber(id).symbol()
        }
    }

    /// Finds the chamber at a grid position
    pub fn find(&self, coord: Coord) -> Option<ChamberId> {
        self.chambers
            .iter()
            .position(|c| c.coord() == coord)
            .map(ChamberId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChamberId, &Chamber)> {
        self.chambers
            .iter()
            .enumerate()
            .map(|(i, chamber)| (ChamberId(i), chamber))
    }

    pub fn mark_start(&mut self, id: ChamberId) -> Result<(), MarkError> {
        self.chambers[id.0].set_start(id)
    }

    pub fn mark_pushed(&mut self, id: ChamberId) -> Result<(), MarkError> {
        self.chambers[id.0].advance_mark(id, MarkState::Pushed)
    }

    pub fn mark_popped(&mut self, id: ChamberId) -> Result<(), MarkError> {
        self.chambers[id.0].advance_mark(id, MarkState::Popped)
    }

    /// Returns true if any chamber carries a traversal mark
    pub fn is_explored(&self) -> bool {
        self.chambers.iter().any(|c| c.is_marked() || c.is_start())
    }

    /// Clears all traversal marks so the map can be explored again
    pub fn reset_marks(&mut self) {
        for chamber in &mut self.chambers {
            chamber.clear_marks();
        }
    }

    /// Counts treasures connected to the entrance through unsealed chambers,
    /// ignoring lighting
    pub fn reachable_treasures(&self) -> usize {
        let mut graph: UnGraph<ChamberId, ()> = UnGraph::with_capacity(self.chambers.len(), 0);
        let nodes: Vec<NodeIndex> = self.iter().map(|(id, _)| graph.add_node(id)).collect();

        for (id, chamber) in self.iter() {
            if chamber.is_sealed() {
                continue;
            }
            // Each undirected edge is added once, from its lower id
            for neighbour in chamber.neighbours().flatten() {
                if neighbour > id && !self.chamber(neighbour).is_sealed() {
                    graph.add_edge(nodes[id.0], nodes[neighbour.0], ());
                }
            }
        }

        let mut bfs = Bfs::new(&graph, nodes[self.entrance.0]);
        let mut found = 0;
        while let Some(node) = bfs.next(&graph) {
            if self.chamber(graph[node]).is_treasure() {
                found += 1;
            }
        }
        found
    }
}

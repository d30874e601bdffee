//! Greedy treasure path search
//!
//! [`PathFinder`] walks a [`HexMap`] depth-first from the entrance, keeping the
//! current route on a [`LinkedStack`]. At every step it moves to the best
//! unmarked neighbour of the chamber on top of the stack, or backtracks when
//! there is none. The walk stops as soon as the last treasure is reached, or
//! when the stack runs empty.
//!
//! ## Neighbour priority
//!
//! Each tier scans slots `0..6` in order and the first match wins:
//!
//! 1. an unmarked treasure chamber
//! 2. an unmarked lighted chamber
//! 3. an unmarked dim chamber (see [`PathFinder::is_dim`])
//!
//! Sealed chambers are never entered. This policy reaches treasures quickly;
//! it does not look for the shortest route.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::chamber::{ChamberId, MarkError, SIDES};
use super::map::HexMap;
use super::stack::{LinkedStack, StackError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Map has already been explored; reset its marks first")]
    MapAlreadyExplored,

    #[error(transparent)]
    Stack(#[from] StackError),

    #[error(transparent)]
    Mark(#[from] MarkError),
}

/// How treasures are tallied towards the stopping condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TreasureCounting {
    /// Each treasure chamber counts once, when it is pushed
    #[default]
    Distinct,
    /// A treasure counts every time it is examined on top of the stack
    PerVisit,
}

impl TreasureCounting {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreasureCounting::Distinct => "distinct",
            TreasureCounting::PerVisit => "per_visit",
        }
    }
}

/// Result of a search
#[derive(Debug)]
pub struct PathOutcome {
    /// Route from the entrance (bottom) to the last chamber reached (top)
    pub path: LinkedStack<ChamberId>,

    /// Distinct treasure chambers the walk reached
    pub treasures_found: usize,

    /// Times a treasure was examined on top of the stack
    pub treasure_visits: usize,

    /// Treasure chambers in the map
    pub treasures_total: usize,

    /// True if every treasure chamber was reached, or the map has none
    pub found_all: bool,

    pub pushes: usize,
    pub pops: usize,
}

impl PathOutcome {
    /// Chamber ids from the entrance to the end of the route
    pub fn route(&self) -> Vec<ChamberId> {
        self.path.to_vec_bottom_up()
    }
}

/// Depth-first treasure search over a map
pub struct PathFinder<'m> {
    map: &'m mut HexMap,
    counting: TreasureCounting,
}

impl<'m> PathFinder<'m> {
    /// Creates a search over `map`, whose chambers must all be unmarked
    pub fn new(map: &'m mut HexMap) -> Self {
        Self {
            map,
            counting: TreasureCounting::default(),
        }
    }

    /// Sets the treasure counting policy
    pub fn with_counting(mut self, counting: TreasureCounting) -> Self {
        self.counting = counting;
        self
    }

    /// Runs the search to completion
    pub fn compute_path(&mut self) -> Result<PathOutcome, PathError> {
        if self.map.is_explored() {
            return Err(PathError::MapAlreadyExplored);
        }

        let entrance = self.map.entrance();
        let treasures_total = self.map.num_treasures();
        let mut path = LinkedStack::new();
        let mut found = 0;
        let mut visits = 0;
        let mut pushes = 0;
        let mut pops = 0;

        self.map.mark_start(entrance)?;
        self.push(&mut path, entrance, &mut found)?;
        pushes += 1;

        while !path.is_empty() {
            let current = *path.peek()?;
            let candidate = self.select_next(current);
            let is_treasure = self.map.chamber(current).is_treasure();

            if is_treasure {
                visits += 1;
            }

            let tally = match self.counting {
                TreasureCounting::Distinct => found,
                TreasureCounting::PerVisit => visits,
            };
            if is_treasure && tally == treasures_total {
                debug!(chamber = %current, found, visits, "treasure tally complete");
                break;
            }

            match candidate {
                Some(next) => {
                    self.push(&mut path, next, &mut found)?;
                    pushes += 1;
                }
                None => {
                    let popped = path.pop()?;
                    self.map.mark_popped(popped)?;
                    pops += 1;
                    debug!(chamber = %popped, depth = path.len(), "backtrack");
                }
            }
        }

        info!(
            treasures_found = found,
            treasure_visits = visits,
            treasures_total,
            path_len = path.len(),
            pushes,
            pops,
            counting = self.counting.as_str(),
            "search finished"
        );

        Ok(PathOutcome {
            path,
            treasures_found: found,
            treasure_visits: visits,
            treasures_total,
            found_all: found == treasures_total,
            pushes,
            pops,
        })
    }

    fn push(
        &mut self,
        path: &mut LinkedStack<ChamberId>,
        id: ChamberId,
        found: &mut usize,
    ) -> Result<(), PathError> {
        self.map.mark_pushed(id)?;
        path.push(id);

        if self.map.chamber(id).is_treasure() {
            *found += 1;
        }
        debug!(chamber = %id, coord = %self.map.chamber(id).coord(), depth = path.len(), "advance");
        Ok(())
    }

    /// Picks the next chamber to visit from `current`, or `None` to backtrack
    pub fn select_next(&self, current: ChamberId) -> Option<ChamberId> {
        self.first_open(current, |id| self.map.chamber(id).is_treasure())
            .or_else(|| self.first_open(current, |id| self.map.chamber(id).is_lighted()))
            .or_else(|| self.first_open(current, |id| self.is_dim(Some(id))))
    }

    /// First unmarked, unsealed neighbour of `current` in slot order matching `pred`
    fn first_open(&self, current: ChamberId, pred: impl Fn(ChamberId) -> bool) -> Option<ChamberId> {
        (0..SIDES)
            .filter_map(|slot| self.map.neighbour(current, slot))
            .find(|&id| {
                let chamber = self.map.chamber(id);
                !chamber.is_marked() && !chamber.is_sealed() && pred(id)
            })
    }

    /// A chamber is dim when it is open and unlit but borders a lighted chamber
    pub fn is_dim(&self, chamber: Option<ChamberId>) -> bool {
        let Some(id) = chamber else {
            return false;
        };
        let Some(cell) = self.map.get(id) else {
            return false;
        };
        if cell.is_sealed() || cell.is_lighted() {
            return false;
        }

        cell.neighbours().flatten().any(|n| {
            let neighbour = self.map.chamber(n);
            neighbour.is_lighted() && !neighbour.is_sealed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chamber::{Chamber, Coord, MarkState};

    /// Builds a map from chambers and explicit `(from, slot, to)` links.
    /// The first chamber is the entrance.
    fn map_of(chambers: Vec<Chamber>, links: &[(usize, usize, usize)]) -> (HexMap, Vec<ChamberId>) {
        let mut builder = HexMap::builder();
        let ids: Vec<_> = chambers.into_iter().map(|c| builder.add(c)).collect();
        for &(from, slot, to) in links {
            builder.link(ids[from], slot, ids[to]).unwrap();
        }
        builder.entrance(ids[0]).unwrap();
        (builder.build().unwrap(), ids)
    }

    fn plain(col: usize) -> Chamber {
        Chamber::new(Coord::new(0, col))
    }

    #[test]
    fn reaches_adjacent_treasure_without_backtracking() {
        let (mut map, ids) = map_of(
            vec![plain(0).lighted(), plain(1).lighted().treasure()],
            &[(0, 1, 1)],
        );

        let outcome = PathFinder::new(&mut map).compute_path().unwrap();

        assert_eq!(outcome.route(), vec![ids[0], ids[1]]);
        assert!(outcome.found_all);
        assert_eq!(outcome.treasures_found, 1);
        assert_eq!(outcome.pops, 0);
        assert!(map.chamber(ids[0]).is_start());
        assert_eq!(map.chamber(ids[1]).mark_state(), MarkState::Pushed);
    }

    #[test]
    fn isolated_entrance_without_treasure_ends_empty() {
        let (mut map, ids) = map_of(
            vec![plain(0).lighted(), plain(1).sealed(), plain(2).sealed()],
            &[(0, 1, 1), (0, 2, 2)],
        );

        let outcome = PathFinder::new(&mut map).compute_path().unwrap();

        assert!(outcome.path.is_empty());
        assert_eq!(outcome.pushes, 1);
        assert_eq!(outcome.pops, 1);
        assert_eq!(map.chamber(ids[0]).mark_state(), MarkState::Popped);
        assert!(!map.chamber(ids[1]).is_marked());
    }

    #[test]
    fn sealed_dead_end_is_never_entered() {
        // A - B - C, where C is a sealed treasure
        let (mut map, ids) = map_of(
            vec![plain(0), plain(1).lighted(), plain(2).sealed().treasure()],
            &[(0, 1, 1), (1, 1, 2)],
        );

        let outcome = PathFinder::new(&mut map).compute_path().unwrap();

        assert!(outcome.path.is_empty());
        assert!(!outcome.found_all);
        assert_eq!(outcome.treasures_found, 0);
        assert_eq!(outcome.pushes, 2);
        assert_eq!(outcome.pops, 2);
        assert_eq!(map.chamber(ids[0]).mark_state(), MarkState::Popped);
        assert_eq!(map.chamber(ids[1]).mark_state(), MarkState::Popped);
        assert_eq!(map.chamber(ids[2]).mark_state(), MarkState::Unmarked);
    }

    #[test]
    fn backtracks_out_of_dead_end_once() {
        // E has one lighted neighbour N1 with nothing beyond it; a treasure
        // elsewhere keeps the search going.
        let (mut map, ids) = map_of(
            vec![plain(0), plain(1).lighted(), plain(5).treasure()],
            &[(0, 1, 1)],
        );

        let outcome = PathFinder::new(&mut map).compute_path().unwrap();

        assert!(outcome.path.is_empty());
        assert_eq!(outcome.pushes, 2);
        assert_eq!(outcome.pops, 2);
        assert_eq!(map.chamber(ids[1]).mark_state(), MarkState::Popped);
    }

    #[test]
    fn treasure_beats_lighted_beats_dim() {
        // Slot 0: dim (it touches the lighted chamber), slot 1: lighted, slot 2: treasure
        let (mut map, ids) = map_of(
            vec![plain(0), plain(1), plain(2).lighted(), plain(3).treasure()],
            &[(0, 0, 1), (0, 1, 2), (0, 2, 3), (1, 2, 2)],
        );

        let finder = PathFinder::new(&mut map);
        assert_eq!(finder.select_next(ids[0]), Some(ids[3]));

        map.mark_pushed(ids[3]).unwrap();
        let finder = PathFinder::new(&mut map);
        assert_eq!(finder.select_next(ids[0]), Some(ids[2]));

        map.mark_pushed(ids[2]).unwrap();
        let finder = PathFinder::new(&mut map);
        assert!(finder.is_dim(Some(ids[1])));
        assert_eq!(finder.select_next(ids[0]), Some(ids[1]));

        map.mark_pushed(ids[1]).unwrap();
        let finder = PathFinder::new(&mut map);
        assert_eq!(finder.select_next(ids[0]), None);
    }

    #[test]
    fn lower_slot_wins_within_a_tier() {
        let (mut map, ids) = map_of(
            vec![plain(0), plain(1).lighted(), plain(2).lighted()],
            &[(0, 4, 1), (0, 2, 2)],
        );

        let finder = PathFinder::new(&mut map);
        assert_eq!(finder.select_next(ids[0]), Some(ids[2]));
    }

    #[test]
    fn dark_chamber_is_not_a_candidate() {
        let (mut map, ids) = map_of(vec![plain(0), plain(1)], &[(0, 1, 1)]);

        let finder = PathFinder::new(&mut map);
        assert!(!finder.is_dim(Some(ids[1])));
        assert_eq!(finder.select_next(ids[0]), None);
    }

    #[test]
    fn is_dim_rules() {
        let (mut map, ids) = map_of(
            vec![
                plain(0).lighted(),
                plain(1),
                plain(2).sealed(),
                plain(3).lighted(),
                plain(4),
                plain(5).sealed().lighted(),
            ],
            &[(0, 1, 1), (0, 2, 2), (0, 3, 3), (4, 1, 5)],
        );

        let finder = PathFinder::new(&mut map);
        assert!(!finder.is_dim(None));
        assert!(finder.is_dim(Some(ids[1])));
        // Sealed and lighted chambers are never dim
        assert!(!finder.is_dim(Some(ids[2])));
        assert!(!finder.is_dim(Some(ids[3])));
        assert!(!finder.is_dim(Some(ids[0])));
        // A sealed light source does not make its neighbours dim
        assert!(!finder.is_dim(Some(ids[4])));
    }

    #[test]
    fn popped_chamber_is_never_selected_again() {
        // E links to A and B, both lighted, and A also touches B.
        // The walk goes E -> A -> B and then unwinds without re-entering anything.
        let (mut map, ids) = map_of(
            vec![plain(0), plain(1).lighted(), plain(2).lighted(), plain(3).treasure()],
            &[(0, 0, 1), (0, 1, 2), (1, 2, 2)],
        );

        let outcome = PathFinder::new(&mut map).compute_path().unwrap();

        assert_eq!(outcome.pushes, 3);
        assert_eq!(outcome.pops, 3);
        for &id in &ids[..3] {
            assert_eq!(map.chamber(id).mark_state(), MarkState::Popped);
        }
    }

    #[test]
    fn finds_treasure_deep_in_a_corridor() {
        // E - L - . - T, the middle chamber dim beside the light
        let (mut map, ids) = map_of(
            vec![plain(0), plain(1).lighted(), plain(2), plain(3).treasure()],
            &[(0, 1, 1), (1, 1, 2), (2, 1, 3)],
        );

        let outcome = PathFinder::new(&mut map).compute_path().unwrap();

        assert!(outcome.found_all);
        assert_eq!(outcome.route(), ids);
        assert_eq!(outcome.path.to_string(), "[#3 #2 #1 #0]");
    }

    #[test]
    fn counting_policies_differ_on_revisited_treasure() {
        // E - T1 - X(lighted dead end), plus an unreachable T2
        let chambers = vec![plain(0), plain(1).treasure(), plain(2).lighted(), plain(9).treasure()];
        let links = [(0, 1, 1), (1, 1, 2)];

        let (mut map, ids) = map_of(chambers.clone(), &links);
        let distinct = PathFinder::new(&mut map).compute_path().unwrap();
        assert!(distinct.path.is_empty());
        assert_eq!(distinct.treasures_found, 1);
        assert_eq!(distinct.treasure_visits, 2);
        assert!(!distinct.found_all);

        let (mut map, _) = map_of(chambers, &links);
        let per_visit = PathFinder::new(&mut map)
            .with_counting(TreasureCounting::PerVisit)
            .compute_path()
            .unwrap();
        // T1 is counted on arrival and again after backtracking from X,
        // which stops the walk although T2 was never reached
        assert_eq!(per_visit.route(), vec![ids[0], ids[1]]);
        assert_eq!(per_visit.treasure_visits, 2);
        assert_eq!(per_visit.treasures_found, 1);
        assert!(!per_visit.found_all);
        assert_eq!(map.chamber(ids[3]).mark_state(), MarkState::Unmarked);
    }

    #[test]
    fn per_visit_reports_all_found_only_when_every_treasure_is_reached() {
        // E - T1 - T2 in a line
        let (mut map, _) = map_of(
            vec![plain(0), plain(1).treasure(), plain(2).treasure()],
            &[(0, 1, 1), (1, 1, 2)],
        );

        let outcome = PathFinder::new(&mut map)
            .with_counting(TreasureCounting::PerVisit)
            .compute_path()
            .unwrap();

        assert_eq!(outcome.treasures_found, 2);
        assert_eq!(outcome.treasure_visits, 2);
        assert!(outcome.found_all);
    }

    #[test]
    fn second_run_requires_reset() {
        let (mut map, _) = map_of(vec![plain(0)], &[]);

        PathFinder::new(&mut map).compute_path().unwrap();
        assert!(matches!(
            PathFinder::new(&mut map).compute_path(),
            Err(PathError::MapAlreadyExplored)
        ));

        map.reset_marks();
        assert!(PathFinder::new(&mut map).compute_path().is_ok());
    }
}

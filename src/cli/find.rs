//! Path search command

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use super::output::Output;
use crate::domain::{HexMap, PathFinder, PathOutcome, TreasureCounting};
use crate::storage::map_file;

/// One chamber of a reported path
#[derive(Debug, Serialize)]
struct PathStep {
    row: usize,
    col: usize,
    symbol: char,
}

#[derive(Debug, Serialize)]
struct FindReport {
    complete: bool,
    treasures_found: usize,
    treasure_visits: usize,
    treasures_total: usize,
    pushes: usize,
    pops: usize,
    counting: &'static str,
    path: Vec<PathStep>,
}

impl FindReport {
    fn new(map: &HexMap, outcome: &PathOutcome, counting: TreasureCounting) -> Self {
        let path = outcome
            .route()
            .into_iter()
            .map(|id| {
                let coord = map.chamber(id).coord();
                PathStep {
                    row: coord.row,
                    col: coord.col,
                    symbol: map.symbol(id),
                }
            })
            .collect();

        Self {
            complete: outcome.found_all,
            treasures_found: outcome.treasures_found,
            treasure_visits: outcome.treasure_visits,
            treasures_total: outcome.treasures_total,
            pushes: outcome.pushes,
            pops: outcome.pops,
            counting: counting.as_str(),
            path,
        }
    }
}

/// Loads a map, runs the search and prints the route
pub fn run(output: &Output, map_path: &Path, counting: TreasureCounting) -> Result<()> {
    let mut map = map_file::load(map_path)?;
    let outcome = PathFinder::new(&mut map)
        .with_counting(counting)
        .compute_path()?;

    let report = FindReport::new(&map, &outcome, counting);

    if output.is_json() {
        output.data(&report);
        return Ok(());
    }

    if report.path.is_empty() {
        println!("No path found: every reachable chamber was explored.");
    } else {
        println!("Path ({} chambers, entrance first):", report.path.len());
        for (i, step) in report.path.iter().enumerate() {
            println!("{:>4}  ({},{})  {}", i + 1, step.row, step.col, step.symbol);
        }
    }

    println!();
    println!(
        "Treasures: {}/{}{}",
        report.treasures_found,
        report.treasures_total,
        if report.complete { " (all found)" } else { "" }
    );
    if counting == TreasureCounting::PerVisit {
        println!("Treasure visits: {}", report.treasure_visits);
    }
    println!("Steps: {} forward, {} back", report.pushes, report.pops);

    Ok(())
}

//! Map inspection command

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::storage::map_file;

/// Loads a map and prints a summary of its chambers
pub fn run(output: &Output, map_path: &Path) -> Result<()> {
    let map = map_file::load(map_path)?;

    let sealed = map.iter().filter(|(_, c)| c.is_sealed()).count();
    let lighted = map.iter().filter(|(_, c)| c.is_lighted()).count();
    let reachable = map.reachable_treasures();
    let entrance = map.chamber(map.entrance()).coord();

    if output.is_json() {
        output.data(&serde_json::json!({
            "chambers": map.len(),
            "sealed": sealed,
            "lighted": lighted,
            "treasures": map.num_treasures(),
            "reachable_treasures": reachable,
            "entrance": entrance,
        }));
        return Ok(());
    }

    println!("Map: {}", map_path.display());
    println!("{:<20} {}", "Entrance", entrance);
    println!("{:<20} {}", "Chambers", map.len());
    println!("{:<20} {}", "Sealed", sealed);
    println!("{:<20} {}", "Lighted", lighted);
    println!("{:<20} {}", "Treasures", map.num_treasures());
    println!("{:<20} {}", "Reachable treasures", reachable);

    if reachable < map.num_treasures() {
        println!();
        println!(
            "Warning: {} treasure(s) are walled off by sealed chambers or rock.",
            map.num_treasures() - reachable
        );
    }

    Ok(())
}

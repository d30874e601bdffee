//! Map file loader
//!
//! Maps are plain text grids. Blank lines and `#`-comments are skipped; every
//! other line is one row of whitespace-separated tokens:
//!
//! | Token | Chamber |
//! |-------|---------|
//! | `E` | entrance |
//! | `T` | treasure |
//! | `L` | lighted |
//! | `.` | ordinary |
//! | `*` | sealed |
//! | `-` | solid rock (no chamber) |
//!
//! ```text
//! # odd rows sit half a cell to the right
//! E . L -
//!  * L . T
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::domain::{BuildError, Chamber, ChamberId, Coord, HexMap};

#[derive(Debug, Error)]
pub enum MapError {
    #[error("Map file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read map file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unknown token '{token}' at line {line}, column {column}")]
    UnknownToken {
        line: usize,
        column: usize,
        token: String,
    },

    #[error("Row at line {line} has {found} cells, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Map has no entrance ('E')")]
    MissingEntrance,

    #[error("Map has more than one entrance: {first} and {second}")]
    MultipleEntrances { first: Coord, second: Coord },

    #[error("Map contains no rows")]
    Empty,

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Loads a map from a file
pub fn load(path: impl AsRef<Path>) -> Result<HexMap, MapError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => MapError::NotFound(path.to_path_buf()),
        _ => MapError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let map = parse(&content)?;
    debug!(
        path = %path.display(),
        chambers = map.len(),
        treasures = map.num_treasures(),
        "loaded map"
    );
    Ok(map)
}

/// Parses map text
pub fn parse(content: &str) -> Result<HexMap, MapError> {
    let mut builder = HexMap::builder();
    let mut entrance: Option<(Coord, ChamberId)> = None;
    let mut width: Option<usize> = None;
    let mut row = 0;

    for (line_num, line) in content.lines().enumerate() {
        let line_no = line_num + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        match width {
            Some(expected) if expected != tokens.len() => {
                return Err(MapError::RaggedRow {
                    line: line_no,
                    expected,
                    found: tokens.len(),
                });
            }
            _ => width = Some(tokens.len()),
        }

        for (col, token) in tokens.iter().enumerate() {
            let coord = Coord::new(row, col);
            let chamber = Chamber::new(coord);
            let chamber = match *token {
                "-" => continue,
                "." | "E" => chamber,
                "T" => chamber.treasure(),
                "L" => chamber.lighted(),
                "*" => chamber.sealed(),
                other => {
                    return Err(MapError::UnknownToken {
                        line: line_no,
                        column: col + 1,
                        token: other.to_string(),
                    });
                }
            };

            let id = builder.add(chamber);
            if *token == "E" {
                if let Some((first, _)) = entrance {
                    return Err(MapError::MultipleEntrances {
                        first,
                        second: coord,
                    });
                }
                entrance = Some((coord, id));
            }
        }

        row += 1;
    }

    if row == 0 {
        return Err(MapError::Empty);
    }
    let (_, entrance) = entrance.ok_or(MapError::MissingEntrance)?;

    builder.link_grid().entrance(entrance)?;
    Ok(builder.build()?)
}

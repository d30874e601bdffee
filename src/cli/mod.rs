//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `find <MAP>` | Search for a path through every treasure |
//! | `check <MAP>` | Validate a map and count what is reachable |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can also be set in the config file under `[output]`.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) to log every step of the search to stderr:
//! ```bash
//! hexpath --verbose find park.map
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod check;
mod find;
mod output;

pub use app::{run, Cli, Commands, CountingArg};
pub use output::{Output, OutputFormat};

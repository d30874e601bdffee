//! hexpath - treasure paths through hexagonal chamber maps

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = hexpath::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

//! Clean command implementation

use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::clean;
use crate::config::loader::CliOverrides;

/// Run the clean command
pub fn run_clean(verbose: bool) -> ExitCode {
    let context = match super::load_context(&CliOverrides::default(), verbose) {
        Ok(context) => context,
        Err(code) => return code,
    };

    match clean::clean(&context) {
        Ok(removed) => {
            println!("Removed {} path(s)", removed.len());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Clean error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

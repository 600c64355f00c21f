//! Stylemill - command-line stylesheet build tool

use std::process::ExitCode;

use stylemill::cli;

fn main() -> ExitCode {
    env_logger::init();
    cli::run()
}

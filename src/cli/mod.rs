//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for the individual task commands.

mod build;
mod clean;
mod lint;
mod watch;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::config::loader::{find_config, load_config, merge_cli_overrides, CliOverrides};
use crate::task::TaskContext;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;

/// Stylemill - compile SCSS to distributable CSS
#[derive(Parser)]
#[command(name = "sty")]
#[command(about = "Stylemill - build stylesheets: lint, compile, watch, clean")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint source stylesheets (incremental: unchanged files are skipped)
    Lint {
        /// Lint all matching files, ignoring the previous-run stamp
        #[arg(long)]
        all: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compile stylesheets to CSS with source maps
    Build {
        /// Minify output (overrides the configured flag)
        #[arg(long)]
        minify: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run lint, then build (lint violations do not block the build)
    Styles {
        /// Minify output (overrides the configured flag)
        #[arg(long)]
        minify: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Watch sources and rebuild on change, serving live-reload events
    Watch {
        /// Override the live-reload port
        #[arg(long)]
        port: Option<u16>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Delete previously generated output
    Clean {
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lint { all, verbose } => lint::run_lint(all, verbose),
        Commands::Build { minify, verbose } => build::run_build(minify.then_some(true), verbose),
        Commands::Styles { minify, verbose } => build::run_styles(minify.then_some(true), verbose),
        Commands::Watch { port, verbose } => watch::run_watch(port, verbose),
        Commands::Clean { verbose } => clean::run_clean(verbose),
    }
}

/// Load the project configuration and build a task context.
///
/// Prints the failure and returns the error exit code when loading fails, so
/// command handlers only deal with the happy path.
pub(crate) fn load_context(
    overrides: &CliOverrides,
    verbose: bool,
) -> Result<TaskContext, ExitCode> {
    let (config, project_root) = match find_config() {
        Some(config_path) => {
            if verbose {
                println!("Using config: {}", config_path.display());
            }
            let config = match load_config(Some(&config_path)) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error loading config: {}", e);
                    return Err(ExitCode::from(EXIT_ERROR));
                }
            };
            let root = config_path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
            (config, root)
        }
        None => {
            if verbose {
                println!("No stylemill.toml found, using defaults");
            }
            let root = std::env::current_dir().unwrap_or_default();
            (crate::config::StyleConfig::default(), root)
        }
    };

    let mut config = config;
    merge_cli_overrides(&mut config, overrides);

    Ok(TaskContext::new(config, project_root).with_verbose(verbose))
}

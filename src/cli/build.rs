//! Build and styles command implementations

use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::config::loader::CliOverrides;
use crate::reload::ReloadHandle;
use crate::task::{self, StylePipeline, TaskContext};

/// Run the build command
pub fn run_build(minify: Option<bool>, verbose: bool) -> ExitCode {
    let overrides = CliOverrides { minify, ..CliOverrides::default() };
    let context = match super::load_context(&overrides, verbose) {
        Ok(context) => context,
        Err(code) => return code,
    };

    match StylePipeline::new(context).build() {
        Ok(report) => {
            if report.is_success() {
                println!("{}", report.summary());
                ExitCode::from(EXIT_SUCCESS)
            } else {
                eprintln!("{}", report.summary());
                ExitCode::from(EXIT_ERROR)
            }
        }
        Err(e) => {
            eprintln!("Build error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run the styles command: lint, then build
pub fn run_styles(minify: Option<bool>, verbose: bool) -> ExitCode {
    let overrides = CliOverrides { minify, ..CliOverrides::default() };
    let context = match super::load_context(&overrides, verbose) {
        Ok(context) => context,
        Err(code) => return code,
    };

    if styles_iteration(&context, &ReloadHandle::disconnected()) {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

/// One composed lint-then-build pass, printing diagnostics and the build
/// summary. Returns whether the build succeeded; lint is advisory and never
/// affects the outcome.
///
/// Shared between the `styles` command and each watch-mode rebuild.
pub(crate) fn styles_iteration(context: &TaskContext, reload: &ReloadHandle) -> bool {
    match task::run_styles(context, None, reload) {
        Ok(outcome) => {
            if let Some(err) = &outcome.lint_error {
                eprintln!("Lint error: {} (continuing with build)", err);
            }
            if let Some(lint) = &outcome.lint {
                super::lint::print_report(lint);
                println!("Lint: {}", lint.summary());
            }

            if outcome.build.is_success() {
                println!("{}", outcome.build.summary());
                true
            } else {
                eprintln!("{}", outcome.build.summary());
                false
            }
        }
        Err(e) => {
            eprintln!("Build error: {}", e);
            false
        }
    }
}

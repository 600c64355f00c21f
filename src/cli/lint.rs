//! Lint command implementation

use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_SUCCESS};
use crate::config::loader::CliOverrides;
use crate::lint::{self, LintReport, Severity};

/// Run the lint command
pub fn run_lint(all: bool, verbose: bool) -> ExitCode {
    let context = match super::load_context(&CliOverrides::default(), verbose) {
        Ok(context) => context,
        Err(code) => return code,
    };

    match lint::run_lint(&context, all) {
        Ok(report) => {
            print_report(&report);
            println!("{}", report.summary());
            if report.error_count() > 0 {
                ExitCode::from(EXIT_ERROR)
            } else {
                ExitCode::from(EXIT_SUCCESS)
            }
        }
        Err(e) => {
            eprintln!("Lint error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Print all issues of a lint report to stderr.
pub(crate) fn print_report(report: &LintReport) {
    let color = atty::is(atty::Stream::Stderr);

    for issue in &report.issues {
        if color {
            let code = match issue.severity {
                Severity::Error => "\x1b[31m",
                Severity::Warning => "\x1b[33m",
            };
            eprintln!(
                "{}:{}: {}{}\x1b[0m {} [{}]",
                issue.file.display(),
                issue.line,
                code,
                issue.severity,
                issue.message,
                issue.rule
            );
        } else {
            eprintln!("{}", issue);
        }
    }
}

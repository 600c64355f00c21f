//! Textual lint rules.
//!
//! Rules operate line-by-line on the raw source so they work on partials and
//! plain CSS alike. Comment-only lines are skipped.

use super::{LintIssue, Severity};
use crate::config::LintConfig;
use std::path::Path;

/// Apply all configured textual rules to a source file's content.
pub fn apply_rules(config: &LintConfig, file: &Path, content: &str) -> Vec<LintIssue> {
    let mut issues = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim_start();

        if trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*') {
            continue;
        }

        if config.no_important && line.contains("!important") {
            issues.push(LintIssue::new(
                file,
                line_number,
                Severity::Error,
                "no-important",
                "unexpected !important",
            ));
        }

        if config.lowercase_hex {
            if let Some(literal) = uppercase_hex_literal(line) {
                issues.push(LintIssue::new(
                    file,
                    line_number,
                    Severity::Warning,
                    "lowercase-hex",
                    format!("expected \"#{}\" to be lowercase", literal),
                ));
            }
        }

        if config.max_line_length > 0 && line.chars().count() > config.max_line_length {
            issues.push(LintIssue::new(
                file,
                line_number,
                Severity::Warning,
                "max-line-length",
                format!(
                    "line is longer than {} characters",
                    config.max_line_length
                ),
            ));
        }
    }

    issues
}

/// Find the first hex color literal on a line that contains an uppercase
/// digit. Identifier-like sequences (`#Main`) are not hex literals.
fn uppercase_hex_literal(line: &str) -> Option<String> {
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'#' {
            let rest = &line[i + 1..];
            let run: String =
                rest.chars().take_while(|c| c.is_ascii_alphanumeric()).collect();

            let is_hex = !run.is_empty() && run.chars().all(|c| c.is_ascii_hexdigit());
            let valid_length = matches!(run.len(), 3 | 4 | 6 | 8);
            if is_hex && valid_length && run.chars().any(|c| c.is_ascii_uppercase()) {
                return Some(run);
            }

            i += 1 + run.len();
        } else {
            i += 1;
        }
    }

    None
}

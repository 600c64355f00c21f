//! Stylesheet linting
//!
//! Validates source stylesheets without modifying them: a syntax check
//! delegated to the SCSS compiler plus a small set of textual rules. Lint
//! runs are incremental: unchanged files are skipped on repeated invocations
//! (see [`stamp`]).

pub mod rules;
pub mod stamp;

pub use stamp::{LintStamp, StampError, STAMP_FILENAME};

use crate::compile::GrassCompiler;
use crate::config::LintConfig;
use crate::task::{discovery, TaskContext};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Severity of a lint issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// A lint issue found in a source file
#[derive(Debug, Clone)]
pub struct LintIssue {
    /// File the issue was found in
    pub file: PathBuf,
    /// Line number (1-indexed); 0 when the issue covers the whole file
    pub line: usize,
    /// Severity of the issue
    pub severity: Severity,
    /// Rule identifier (e.g. "no-important", "syntax")
    pub rule: &'static str,
    /// Human-readable message describing the issue
    pub message: String,
}

impl LintIssue {
    /// Create a new issue
    pub fn new(
        file: &Path,
        line: usize,
        severity: Severity,
        rule: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self { file: file.to_path_buf(), line, severity, rule, message: message.into() }
    }
}

impl std::fmt::Display for LintIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file.display())?;
        if self.line > 0 {
            write!(f, ":{}", self.line)?;
        }
        write!(f, ": {} {} [{}]", self.severity, self.message, self.rule)
    }
}

/// Result of a lint run
#[derive(Debug, Default)]
pub struct LintReport {
    /// All collected issues
    pub issues: Vec<LintIssue>,
    /// Number of files processed in this run
    pub files_checked: usize,
}

impl LintReport {
    /// Number of error-severity issues
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Error).count()
    }

    /// Number of warning-severity issues
    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Warning).count()
    }

    /// Check if the run found no issues at all
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Format a one-line summary of the run
    pub fn summary(&self) -> String {
        format!(
            "{} file(s) checked, {} error(s), {} warning(s)",
            self.files_checked,
            self.error_count(),
            self.warning_count()
        )
    }
}

/// Error that prevents a lint run from completing.
///
/// Individual file problems (unreadable file, syntax error) are reported as
/// issues, not errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LintError {
    /// Source discovery error
    #[error(transparent)]
    Discovery(#[from] discovery::DiscoveryError),
    /// Stamp persistence error
    #[error(transparent)]
    Stamp(#[from] StampError),
}

/// Linter for stylesheet sources
pub struct Linter {
    config: LintConfig,
    compiler: Option<GrassCompiler>,
}

impl Linter {
    /// Create a linter with textual rules only
    pub fn new(config: LintConfig) -> Self {
        Self { config, compiler: None }
    }

    /// Attach a compiler used for syntax checking.
    ///
    /// Partials are excluded from the syntax check: they only compile in the
    /// context of their importer.
    pub fn with_compiler(mut self, compiler: GrassCompiler) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Lint a set of files, collecting all issues into a report.
    pub fn lint_files(&self, files: &[PathBuf]) -> LintReport {
        let mut report = LintReport { files_checked: files.len(), ..LintReport::default() };

        for file in files {
            self.lint_file(file, &mut report);
        }

        report
    }

    fn lint_file(&self, file: &Path, report: &mut LintReport) {
        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(err) => {
                report.issues.push(LintIssue::new(
                    file,
                    0,
                    Severity::Error,
                    "io",
                    format!("could not read file: {}", err),
                ));
                return;
            }
        };

        report.issues.extend(rules::apply_rules(&self.config, file, &content));

        if let Some(compiler) = &self.compiler {
            if !discovery::is_partial(file) {
                if let Err(err) = compiler.check(file) {
                    report.issues.push(LintIssue::new(
                        file,
                        0,
                        Severity::Error,
                        "syntax",
                        err.to_string(),
                    ));
                }
            }
        }
    }
}

/// Run the lint task for a project.
///
/// Discovers the lint file set, restricts it to files modified since the
/// previous run (unless `all` is set), lints them, and records a new stamp.
/// The stamp is written whenever the run completes, with or without
/// violations.
pub fn run_lint(context: &TaskContext, all: bool) -> Result<LintReport, LintError> {
    let files = discovery::discover_files(context.project_root(), context.lint_globs())?;

    let stamp = if all {
        None
    } else {
        LintStamp::load_from_dir(&context.dest_dir()).ok().flatten()
    };

    let files = match stamp {
        Some(stamp) => discovery::modified_since(files, stamp.last_run_ms),
        None => files,
    };

    if context.is_verbose() {
        println!("Linting {} file(s)", files.len());
    }

    let compiler = GrassCompiler::new(&context.config().sass, context.project_root());
    let report = Linter::new(context.config().lint.clone()).with_compiler(compiler).lint_files(&files);

    LintStamp::now().save_to_dir(&context.dest_dir())?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleConfig;
    use filetime::FileTime;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_context() -> (TempDir, TaskContext) {
        let temp = TempDir::new().unwrap();
        let config = StyleConfig::default();
        let ctx = TaskContext::new(config, temp.path().to_path_buf());

        fs::create_dir_all(temp.path().join("styles")).unwrap();

        (temp, ctx)
    }

    #[test]
    fn test_lint_report_counts() {
        let mut report = LintReport::default();
        report.issues.push(LintIssue::new(
            Path::new("a.scss"),
            1,
            Severity::Error,
            "no-important",
            "unexpected !important",
        ));
        report.issues.push(LintIssue::new(
            Path::new("a.scss"),
            2,
            Severity::Warning,
            "lowercase-hex",
            "uppercase hex",
        ));

        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_lint_issue_display() {
        let issue = LintIssue::new(
            Path::new("styles/a.scss"),
            3,
            Severity::Error,
            "no-important",
            "unexpected !important",
        );
        let text = issue.to_string();
        assert!(text.contains("styles/a.scss:3"));
        assert!(text.contains("ERROR"));
        assert!(text.contains("[no-important]"));
    }

    #[test]
    fn test_linter_unreadable_file_becomes_issue() {
        let linter = Linter::new(LintConfig::default());
        let report = linter.lint_files(&[PathBuf::from("/nonexistent/a.scss")]);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.issues[0].rule, "io");
    }

    #[test]
    fn test_linter_syntax_check() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("broken.scss");
        fs::write(&file, ".a { color: ; }\n").unwrap();

        let compiler = GrassCompiler::new(&Default::default(), temp.path());
        let linter = Linter::new(LintConfig::default()).with_compiler(compiler);
        let report = linter.lint_files(&[file]);

        assert_eq!(report.error_count(), 1);
        assert_eq!(report.issues[0].rule, "syntax");
    }

    #[test]
    fn test_linter_skips_syntax_check_for_partials() {
        let temp = TempDir::new().unwrap();
        // Standalone compilation of this partial would fail: $accent is
        // defined by the importer.
        let file = temp.path().join("_theme.scss");
        fs::write(&file, ".a { color: $accent; }\n").unwrap();

        let compiler = GrassCompiler::new(&Default::default(), temp.path());
        let linter = Linter::new(LintConfig::default()).with_compiler(compiler);
        let report = linter.lint_files(&[file]);

        assert!(report.is_clean());
    }

    #[test]
    fn test_run_lint_zero_matches() {
        let (_temp, ctx) = create_test_context();
        let report = run_lint(&ctx, false).unwrap();
        assert_eq!(report.files_checked, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_run_lint_incremental_skips_unchanged() {
        let (temp, ctx) = create_test_context();
        fs::write(temp.path().join("styles/a.scss"), ".a { color: #abc; }\n").unwrap();
        fs::write(temp.path().join("styles/b.scss"), ".b { margin: 0; }\n").unwrap();

        let first = run_lint(&ctx, false).unwrap();
        assert_eq!(first.files_checked, 2);

        let second = run_lint(&ctx, false).unwrap();
        assert_eq!(second.files_checked, 0);
        assert!(second.is_clean());
    }

    #[test]
    fn test_run_lint_detects_modified_file() {
        let (temp, ctx) = create_test_context();
        let file = temp.path().join("styles/a.scss");
        fs::write(&file, ".a { color: #abc; }\n").unwrap();

        run_lint(&ctx, false).unwrap();

        // Simulate an edit two seconds in the future to defeat coarse
        // filesystem timestamp resolution.
        let future = FileTime::from_unix_time(
            (stamp::now_ms() / 1000) as i64 + 2,
            0,
        );
        filetime::set_file_mtime(&file, future).unwrap();

        let report = run_lint(&ctx, false).unwrap();
        assert_eq!(report.files_checked, 1);
    }

    #[test]
    fn test_run_lint_all_ignores_stamp() {
        let (temp, ctx) = create_test_context();
        fs::write(temp.path().join("styles/a.scss"), ".a { color: #abc; }\n").unwrap();

        run_lint(&ctx, false).unwrap();

        let report = run_lint(&ctx, true).unwrap();
        assert_eq!(report.files_checked, 1);
    }

    #[test]
    fn test_run_lint_reports_violations() {
        let (temp, ctx) = create_test_context();
        fs::write(
            temp.path().join("styles/a.scss"),
            ".a { color: #FFAA00 !important; }\n",
        )
        .unwrap();

        let report = run_lint(&ctx, false).unwrap();
        assert_eq!(report.files_checked, 1);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
    }
}

//! Build tasks for stylesheet processing
//!
//! Provides the core tasks behind the CLI:
//! - **Discovery**: Find source files using glob patterns from config
//! - **Pipeline**: Compile, post-process and write each stylesheet
//! - **Compose**: Run lint, then build, in sequence
//!
//! # Example
//!
//! ```ignore
//! use stylemill::config::load_config;
//! use stylemill::task::{StylePipeline, TaskContext};
//!
//! let config = load_config(None)?;
//! let context = TaskContext::new(config, project_root);
//! let report = StylePipeline::new(context).build()?;
//! println!("{}", report.summary());
//! ```

pub mod context;
pub mod discovery;
pub mod pipeline;
pub mod result;

pub use context::*;
pub use discovery::*;
pub use pipeline::*;
pub use result::*;

use crate::lint::{self, LintReport};
use crate::reload::ReloadHandle;

/// Outcome of the composed `styles` task.
///
/// Lint is advisory: a lint run that could not even start is captured as
/// `lint_error` and never prevents the build from running.
#[derive(Debug)]
pub struct StylesOutcome {
    /// Lint diagnostics, if the lint run completed
    pub lint: Option<LintReport>,
    /// Error that prevented the lint run from completing
    pub lint_error: Option<String>,
    /// Build report
    pub build: BuildReport,
}

/// Run the composed `styles` task: lint, then build.
///
/// The build always runs after lint, regardless of how many violations the
/// linter reported. `minify` overrides the configured minification flag when
/// set.
pub fn run_styles(
    context: &TaskContext,
    minify: Option<bool>,
    reload: &ReloadHandle,
) -> Result<StylesOutcome, PipelineError> {
    let (lint_report, lint_error) = match lint::run_lint(context, false) {
        Ok(report) => (Some(report), None),
        Err(err) => (None, Some(err.to_string())),
    };

    let mut pipeline = StylePipeline::new(context.clone()).with_reload(reload.clone());
    if let Some(minify) = minify {
        pipeline = pipeline.with_minify(minify);
    }
    let build = pipeline.build()?;

    Ok(StylesOutcome { lint: lint_report, lint_error, build })
}

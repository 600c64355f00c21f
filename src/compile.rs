//! SCSS compilation.
//!
//! This module uses [`grass`] under the hood. The compiler is modeled as a
//! trait so the pipeline depends only on the `compile a file to CSS text`
//! capability, not on a specific implementation.

use crate::config::SassConfig;
use std::path::Path;
use thiserror::Error;

/// Error during SCSS compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Compiler-reported error (syntax, undefined variable, missing import)
    #[error(transparent)]
    Sass(#[from] Box<grass::Error>),
}

/// A stylesheet compiler: source file in, CSS text out.
pub trait StyleCompiler {
    /// Compile a single source file to CSS.
    fn compile(&self, source: &Path) -> Result<String, CompileError>;
}

/// SCSS compiler backed by `grass`.
pub struct GrassCompiler {
    options: grass::Options<'static>,
}

impl GrassCompiler {
    /// Create and configure a compiler from the `[sass]` config section.
    ///
    /// Relative load paths are resolved against `project_root`.
    pub fn new(config: &SassConfig, project_root: &Path) -> Self {
        let style = match config.style.as_str() {
            "compressed" => grass::OutputStyle::Compressed,
            _ => grass::OutputStyle::Expanded,
        };

        let mut options = grass::Options::default().style(style).quiet(config.quiet);
        for load_path in &config.load_paths {
            let resolved = if load_path.is_absolute() {
                load_path.clone()
            } else {
                project_root.join(load_path)
            };
            options = options.load_path(resolved);
        }

        Self { options }
    }

    /// Compile a file and discard the output.
    ///
    /// Used by the linter as a syntax check.
    pub fn check(&self, source: &Path) -> Result<(), CompileError> {
        self.compile(source).map(|_| ())
    }
}

impl StyleCompiler for GrassCompiler {
    fn compile(&self, source: &Path) -> Result<String, CompileError> {
        Ok(grass::from_path(source, &self.options)?)
    }
}

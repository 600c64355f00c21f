//! Stylesheet build pipeline.
//!
//! Compiles each discovered source file, post-processes the output (vendor
//! prefixes, optional minification), writes CSS plus source map into the
//! destination directory, and finally pushes a live-reload event.
//!
//! A failure in one file is captured in that file's [`FileResult`] and never
//! aborts the run: remaining files still build, and outputs already written
//! stay on disk.

use crate::compile::{GrassCompiler, StyleCompiler};
use crate::postprocess::PostProcessor;
use crate::reload::{ReloadEvent, ReloadHandle};
use crate::task::{discovery, FileResult, BuildReport, TaskContext};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Error that aborts a whole build run (as opposed to per-file failures,
/// which are captured in the report).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// Source discovery error
    #[error(transparent)]
    Discovery(#[from] discovery::DiscoveryError),
    /// Destination directory could not be created
    #[error("Failed to create destination directory: {0}")]
    Dest(std::io::Error),
}

/// Build pipeline for compiling stylesheets.
pub struct StylePipeline {
    /// Task context
    context: TaskContext,
    /// Whether to minify output (defaults to the configured flag)
    minify: bool,
    /// Live-reload channel notified after each run
    reload: ReloadHandle,
}

impl StylePipeline {
    /// Create a new pipeline from a task context.
    pub fn new(context: TaskContext) -> Self {
        let minify = context.config().run.minify;
        Self { context, minify, reload: ReloadHandle::disconnected() }
    }

    /// Override the minification flag.
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Attach a live-reload handle notified after each run.
    pub fn with_reload(mut self, reload: ReloadHandle) -> Self {
        self.reload = reload;
        self
    }

    /// Run the build pipeline.
    ///
    /// Discovers sources, builds each file in order, then fires the
    /// live-reload notification (best-effort).
    pub fn build(&self) -> Result<BuildReport, PipelineError> {
        let start = Instant::now();

        let sources =
            discovery::compile_sources(self.context.project_root(), self.context.src_globs())?;

        let dest = self.context.dest_dir();
        fs::create_dir_all(&dest).map_err(PipelineError::Dest)?;

        let compiler = GrassCompiler::new(&self.context.config().sass, self.context.project_root());
        let post = PostProcessor::new(&self.context.config().targets);

        let mut report = BuildReport::new();
        for source in sources {
            report.add_result(self.build_file(&compiler, &post, &source, &dest));
        }

        self.notify_reload(&report);

        report.total_duration = start.elapsed();
        Ok(report)
    }

    /// Build a single source file.
    fn build_file(
        &self,
        compiler: &GrassCompiler,
        post: &PostProcessor,
        source: &Path,
        dest: &Path,
    ) -> FileResult {
        let start = Instant::now();

        if self.context.is_verbose() {
            println!("Compiling: {} ...", source.display());
        }

        match self.compile_and_write(compiler, post, source, dest) {
            Ok(outputs) => {
                let duration = start.elapsed();
                if self.context.is_verbose() {
                    println!("  Done in {:?}", duration);
                }
                FileResult::success(source.to_path_buf(), outputs, duration)
            }
            Err(error) => {
                let duration = start.elapsed();
                if self.context.is_verbose() {
                    println!("  Failed: {}", error);
                }
                FileResult::failed(source.to_path_buf(), error, duration)
            }
        }
    }

    /// Compile, post-process and write one file. Any stage error is returned
    /// as a string so the caller can record it without aborting the run.
    fn compile_and_write(
        &self,
        compiler: &GrassCompiler,
        post: &PostProcessor,
        source: &Path,
        dest: &Path,
    ) -> Result<Vec<PathBuf>, String> {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| format!("Invalid source file name: {}", source.display()))?;
        let css_name = format!("{}.css", stem);
        let map_name = format!("{}.css.map", stem);

        let css = compiler
            .compile(source)
            .map_err(|e| format!("{}: {}", source.display(), e))?;

        let source_label = source
            .strip_prefix(self.context.project_root())
            .unwrap_or(source)
            .to_string_lossy()
            .into_owned();
        let processed = post
            .process(&css, &source_label, self.minify)
            .map_err(|e| format!("{}: {}", source.display(), e))?;

        let css_path = dest.join(&css_name);
        let map_path = dest.join(&map_name);

        let mut code = processed.code;
        code.push_str(&format!("\n/*# sourceMappingURL={} */\n", map_name));
        fs::write(&css_path, code)
            .map_err(|e| format!("Failed to write {}: {}", css_path.display(), e))?;

        let mut outputs = vec![css_path];
        if let Some(map) = processed.map {
            fs::write(&map_path, map)
                .map_err(|e| format!("Failed to write {}: {}", map_path.display(), e))?;
            outputs.push(map_path);
        }

        Ok(outputs)
    }

    /// Push one live-reload event for the run. Best-effort: a dead or absent
    /// channel never fails the build.
    fn notify_reload(&self, report: &BuildReport) {
        let updated: Vec<String> = report
            .files
            .iter()
            .filter(|r| r.is_success())
            .flat_map(|r| r.outputs.iter())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("css"))
            .map(|p| p.to_string_lossy().into_owned())
            .collect();

        let notified = self.reload.broadcast(&ReloadEvent::update(updated));
        log::debug!("live-reload: notified {} client(s)", notified);
    }
}

//! CSS post-processing.
//!
//! This module uses [`lightningcss`] under the hood: vendor prefixes are
//! emitted for the configured browser targets on every build, whitespace
//! minification only when requested. The printer records a source map as a
//! side effect of serialization.

use crate::config::TargetsConfig;
use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use parcel_sourcemap::SourceMap;
use thiserror::Error;

/// Error during CSS post-processing.
///
/// The underlying lightningcss errors borrow the input source, so they are
/// rendered to strings at the boundary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PostprocessError {
    /// CSS parse error
    #[error("parse error: {0}")]
    Parse(String),
    /// Transform/minification error
    #[error("transform error: {0}")]
    Transform(String),
    /// Serialization error
    #[error("print error: {0}")]
    Print(String),
    /// Source map serialization error
    #[error("source map error: {0}")]
    SourceMap(String),
}

/// Post-processed CSS plus its source map JSON.
#[derive(Debug, Clone)]
pub struct ProcessedStyles {
    /// Final CSS text
    pub code: String,
    /// Source map JSON, when one could be produced
    pub map: Option<String>,
}

/// CSS post-processor applying vendor prefixes, optional minification, and
/// source-map recording.
pub struct PostProcessor {
    targets: Targets,
}

impl PostProcessor {
    /// Create a post-processor from the `[targets]` config section.
    pub fn new(config: &TargetsConfig) -> Self {
        Self { targets: Targets { browsers: Some(browsers_from_config(config)), ..Targets::default() } }
    }

    /// Run the post-processing stage over one compiled stylesheet.
    ///
    /// `filename` is recorded in the source map's `sources` list. Prefixing
    /// always happens; `minify` only toggles compact output.
    pub fn process(
        &self,
        css: &str,
        filename: &str,
        minify: bool,
    ) -> Result<ProcessedStyles, PostprocessError> {
        let mut stylesheet = StyleSheet::parse(
            css,
            ParserOptions { filename: filename.to_string(), ..ParserOptions::default() },
        )
        .map_err(|e| PostprocessError::Parse(e.to_string()))?;

        stylesheet
            .minify(MinifyOptions { targets: self.targets, ..MinifyOptions::default() })
            .map_err(|e| PostprocessError::Transform(e.to_string()))?;

        let mut source_map = SourceMap::new("/");
        source_map.add_source(filename);
        let _ = source_map.set_source_content(0, css);
        let result = stylesheet
            .to_css(PrinterOptions {
                minify,
                targets: self.targets,
                source_map: Some(&mut source_map),
                ..PrinterOptions::default()
            })
            .map_err(|e| PostprocessError::Print(e.to_string()))?;

        let map = source_map
            .to_json(None)
            .map_err(|e| PostprocessError::SourceMap(format!("{:?}", e)))?;

        Ok(ProcessedStyles { code: result.code, map: Some(map) })
    }
}

/// Build a lightningcss browser set from the configured version strings.
///
/// Unparseable versions have already been rejected by config validation;
/// anything that still slips through is ignored here.
fn browsers_from_config(config: &TargetsConfig) -> Browsers {
    let version = |value: &Option<String>| value.as_deref().and_then(parse_browser_version);

    Browsers {
        safari: version(&config.safari),
        ios_saf: version(&config.ios),
        chrome: version(&config.chrome),
        firefox: version(&config.firefox),
        edge: version(&config.edge),
        ie: version(&config.ie),
        android: version(&config.android),
        opera: version(&config.opera),
        samsung: version(&config.samsung),
    }
}

/// Parse a "major", "major.minor" or "major.minor.patch" version string into
/// the packed `(major << 16) | (minor << 8) | patch` form lightningcss uses.
pub fn parse_browser_version(version: &str) -> Option<u32> {
    let mut parts = version.split('.');

    let major: u32 = parts.next()?.parse().ok()?;
    let minor: u32 = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    let patch: u32 = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };

    if parts.next().is_some() || major > 0xFFFF || minor > 0xFF || patch > 0xFF {
        return None;
    }

    Some((major << 16) | (minor << 8) | patch)
}

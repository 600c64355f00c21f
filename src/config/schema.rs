//! Configuration schema types for `stylemill.toml`
//!
//! Defines the structure and validation rules for a stylemill project
//! configuration. Every section has defaults, so an empty file (or no file at
//! all) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Path sets consumed by the individual tasks.
///
/// All entries except `dest` are glob patterns relative to the project root.
/// A pattern matching zero files is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Globs identifying files to lint
    #[serde(default = "default_style_globs")]
    pub lint: Vec<String>,
    /// Globs identifying files to compile (partials `_*.scss` are skipped)
    #[serde(default = "default_style_globs")]
    pub src: Vec<String>,
    /// Output directory for compiled CSS and source maps
    #[serde(default = "default_dest")]
    pub dest: PathBuf,
    /// Globs observed for change-triggered rebuilds
    #[serde(default = "default_style_globs")]
    pub watch: Vec<String>,
    /// Paths/globs removed by `clean`
    #[serde(default = "default_clean")]
    pub clean: Vec<String>,
}

fn default_style_globs() -> Vec<String> {
    vec!["styles/**/*.scss".to_string()]
}

fn default_dest() -> PathBuf {
    PathBuf::from("dist/css")
}

fn default_clean() -> Vec<String> {
    vec!["dist/css".to_string()]
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            lint: default_style_globs(),
            src: default_style_globs(),
            dest: default_dest(),
            watch: default_style_globs(),
            clean: default_clean(),
        }
    }
}

/// Options handed to the SCSS compiler. Opaque to the tasks themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SassConfig {
    /// Additional import lookup directories, relative to the project root
    #[serde(default = "default_load_paths")]
    pub load_paths: Vec<PathBuf>,
    /// Output style: "expanded" or "compressed"
    #[serde(default = "default_sass_style")]
    pub style: String,
    /// Suppress compiler warnings
    #[serde(default)]
    pub quiet: bool,
}

fn default_load_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("styles")]
}

fn default_sass_style() -> String {
    "expanded".to_string()
}

impl Default for SassConfig {
    fn default() -> Self {
        Self {
            load_paths: default_load_paths(),
            style: default_sass_style(),
            quiet: false,
        }
    }
}

/// Lint rule toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintConfig {
    /// Flag `!important` declarations (error severity)
    #[serde(default = "default_true")]
    pub no_important: bool,
    /// Flag uppercase hex color literals (warning severity)
    #[serde(default = "default_true")]
    pub lowercase_hex: bool,
    /// Maximum source line length, 0 disables the check
    #[serde(default)]
    pub max_line_length: usize,
}

fn default_true() -> bool {
    true
}

impl Default for LintConfig {
    fn default() -> Self {
        Self { no_important: true, lowercase_hex: true, max_line_length: 0 }
    }
}

/// Browser floor for vendor prefixing, as "major" or "major.minor" strings.
///
/// Unset browsers are not considered when deciding which prefixes to emit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetsConfig {
    /// Minimum Safari version
    #[serde(default = "default_safari")]
    pub safari: Option<String>,
    /// Minimum iOS Safari version
    #[serde(default = "default_safari")]
    pub ios: Option<String>,
    /// Minimum Chrome version
    #[serde(default = "default_chrome")]
    pub chrome: Option<String>,
    /// Minimum Firefox version
    #[serde(default = "default_firefox")]
    pub firefox: Option<String>,
    /// Minimum Edge version
    #[serde(default = "default_edge")]
    pub edge: Option<String>,
    /// Minimum Internet Explorer version
    #[serde(default)]
    pub ie: Option<String>,
    /// Minimum Android WebView version
    #[serde(default)]
    pub android: Option<String>,
    /// Minimum Opera version
    #[serde(default)]
    pub opera: Option<String>,
    /// Minimum Samsung Internet version
    #[serde(default)]
    pub samsung: Option<String>,
}

fn default_safari() -> Option<String> {
    Some("9".to_string())
}

fn default_chrome() -> Option<String> {
    Some("50".to_string())
}

fn default_firefox() -> Option<String> {
    Some("50".to_string())
}

fn default_edge() -> Option<String> {
    Some("14".to_string())
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            safari: default_safari(),
            ios: default_safari(),
            chrome: default_chrome(),
            firefox: default_firefox(),
            edge: default_edge(),
            ie: None,
            android: None,
            opera: None,
            samsung: None,
        }
    }
}

/// Toggles for optional pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunConfig {
    /// Minify compiled CSS (vendor prefixing is always applied)
    #[serde(default)]
    pub minify: bool,
}

/// Live-reload channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadConfig {
    /// TCP port the watch-mode reload server listens on
    #[serde(default = "default_reload_port")]
    pub port: u16,
}

fn default_reload_port() -> u16 {
    35729
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self { port: default_reload_port() }
    }
}

/// Watch mode configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
    /// Clear terminal between rebuilds
    #[serde(default)]
    pub clear_screen: bool,
}

fn default_debounce_ms() -> u32 {
    100
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 100, clear_screen: false }
    }
}

/// Complete stylemill.toml configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StyleConfig {
    /// Task path sets
    #[serde(default)]
    pub paths: PathsConfig,
    /// SCSS compiler options
    #[serde(default)]
    pub sass: SassConfig,
    /// Lint rules
    #[serde(default)]
    pub lint: LintConfig,
    /// Vendor prefix targets
    #[serde(default)]
    pub targets: TargetsConfig,
    /// Optional pipeline stages
    #[serde(default)]
    pub run: RunConfig,
    /// Live-reload settings
    #[serde(default)]
    pub reload: ReloadConfig,
    /// Watch mode settings
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "paths.dest")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stylemill.toml: '{}' {}", self.field, self.message)
    }
}

impl StyleConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.paths.dest.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "paths.dest".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }

        if self.watch.debounce_ms == 0 {
            errors.push(ConfigValidationError {
                field: "watch.debounce_ms".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        let styles = ["expanded", "compressed"];
        if !styles.contains(&self.sass.style.as_str()) {
            errors.push(ConfigValidationError {
                field: "sass.style".to_string(),
                message: format!("must be one of: {}", styles.join(", ")),
            });
        }

        for (field, value) in [
            ("targets.safari", &self.targets.safari),
            ("targets.ios", &self.targets.ios),
            ("targets.chrome", &self.targets.chrome),
            ("targets.firefox", &self.targets.firefox),
            ("targets.edge", &self.targets.edge),
            ("targets.ie", &self.targets.ie),
            ("targets.android", &self.targets.android),
            ("targets.opera", &self.targets.opera),
            ("targets.samsung", &self.targets.samsung),
        ] {
            if let Some(version) = value {
                if crate::postprocess::parse_browser_version(version).is_none() {
                    errors.push(ConfigValidationError {
                        field: field.to_string(),
                        message: format!(
                            "'{}' is not a valid version (expected \"major\" or \"major.minor\")",
                            version
                        ),
                    });
                }
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

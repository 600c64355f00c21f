//! Configuration loading and discovery for `stylemill.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::StyleConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file.
pub const CONFIG_FILENAME: &str = "stylemill.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse stylemill.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Force minification on
    pub minify: Option<bool>,
    /// Override the live-reload port
    pub port: Option<u16>,
}

/// Find stylemill.toml by walking up from the current working directory.
///
/// # Returns
/// - `Some(path)` if a stylemill.toml file is found
/// - `None` if no config file is found
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find stylemill.toml by walking up from a specific directory.
///
/// This is the internal implementation that allows specifying the start
/// directory, useful for testing.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }

        // Move to parent directory
        if !current.pop() {
            // Reached root, no config found
            return None;
        }
    }
}

/// Load configuration from a stylemill.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// `find_config()` to locate the config file. If no config file is found,
/// returns the default configuration.
pub fn load_config(path: Option<&Path>) -> Result<StyleConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(StyleConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<StyleConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: StyleConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut StyleConfig, overrides: &CliOverrides) {
    if let Some(minify) = overrides.minify {
        config.run.minify = minify;
    }

    if let Some(port) = overrides.port {
        config.reload.port = port;
    }
}

/// Get the project root directory from a config file path.
///
/// Returns the parent directory of the stylemill.toml file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILENAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(b"[run]\nminify = true")
            .expect("should write config content");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILENAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(b"")
            .expect("should write config content");

        let subdir = temp.path().join("styles").join("components");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_load_config_from_path() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "[paths]\ndest = \"out/css\"\n").unwrap();

        let config = load_config(Some(&config_path)).unwrap();
        assert_eq!(config.paths.dest, PathBuf::from("out/css"));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "[paths\ndest = ").unwrap();

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_failure() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "[sass]\nstyle = \"nested\"\n").unwrap();

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = StyleConfig::default();
        let overrides = CliOverrides { minify: Some(true), port: Some(4040) };

        merge_cli_overrides(&mut config, &overrides);
        assert!(config.run.minify);
        assert_eq!(config.reload.port, 4040);
    }

    #[test]
    fn test_merge_cli_overrides_empty() {
        let mut config = StyleConfig::default();
        merge_cli_overrides(&mut config, &CliOverrides::default());
        assert!(!config.run.minify);
        assert_eq!(config.reload.port, 35729);
    }

    #[test]
    fn test_project_root() {
        let path = Path::new("/work/site/stylemill.toml");
        assert_eq!(project_root(path), Some(Path::new("/work/site")));
    }
}

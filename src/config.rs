//! Configuration management for phpfold.
//!
//! This module provides the [`Config`] struct which controls how scanner matches
//! become folding regions and which files are picked up. Configuration can be
//! loaded from:
//! - TOML files (`phpfold.toml`)
//! - CLI arguments (which override file settings)
//!
//! Config files are auto-discovered by searching parent directories from the file
//! being processed up to the filesystem root, plus the user's home directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::fold::FoldOptions;

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["phpfold.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    // Windows
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

fn default_true() -> bool {
    true
}
fn default_min_lines() -> usize {
    1
}

/// Main configuration struct for phpfold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// End folding regions before the closing delimiter line (default: true)
    #[serde(default = "default_true")]
    pub exclude_closing_line: bool,

    /// Report block comments as folding regions (default: true)
    #[serde(default = "default_true")]
    pub fold_comments: bool,

    /// Minimum distance between opening and closing lines (default: 1)
    #[serde(default = "default_min_lines")]
    pub min_lines: usize,

    /// Report 1-based line numbers (default: false)
    #[serde(default)]
    pub one_based: bool,

    /// Extra file extensions treated as PHP, on top of the built-in list
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    pub exclude_closing_line: Option<bool>,
    pub fold_comments: Option<bool>,
    pub min_lines: Option<usize>,
    pub one_based: Option<bool>,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            exclude_closing_line: true,
            fold_comments: true,
            min_lines: 1,
            one_based: false,
            extensions: Vec::new(),
        }
    }
}

impl Config {
    /// Upper bound for `min_lines`
    const MAX_MIN_LINES: usize = 10_000;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.min_lines == 0 {
            return Some("min_lines must be at least 1".to_string());
        }
        if self.min_lines > Self::MAX_MIN_LINES {
            return Some(format!(
                "min_lines {} exceeds maximum of {}",
                self.min_lines,
                Self::MAX_MIN_LINES
            ));
        }
        if let Some(ext) = self
            .extensions
            .iter()
            .find(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Some(format!("invalid extension {ext:?}"));
        }
        None
    }

    /// Options for [`crate::fold::to_folding_regions`]
    #[must_use]
    pub fn fold_options(&self) -> FoldOptions {
        FoldOptions {
            exclude_closing_line: self.exclude_closing_line,
            fold_comments: self.fold_comments,
            min_lines: self.min_lines,
            one_based: self.one_based,
        }
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = partial.exclude_closing_line {
            self.exclude_closing_line = v;
        }
        if let Some(v) = partial.fold_comments {
            self.fold_comments = v;
        }
        if let Some(v) = partial.min_lines {
            self.min_lines = v;
        }
        if let Some(v) = partial.one_based {
            self.one_based = v;
        }
        for ext in &partial.extensions {
            if !self.extensions.contains(ext) {
                self.extensions.push(ext.clone());
            }
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Searches from the file's directory up to the root, then adds home directory config.
    /// Returns list of config file paths in order of priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            std::env::current_dir().ok()
        };

        if let Some(dir) = start_dir {
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            // Root first, so closer configs override
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Files that fail to read or parse are skipped with a warning.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        Self::from_files(&Self::discover_config_files(start_path))
    }

    /// Merge the given config files in order
    #[must_use]
    pub fn from_files(config_files: &[PathBuf]) -> Self {
        let mut config = Self::default();
        for path in config_files {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(&partial),
                    Err(e) => warn!("failed to parse {}: {e}", path.display()),
                },
                Err(e) => warn!("failed to read {}: {e}", path.display()),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.exclude_closing_line);
        assert!(config.fold_comments);
        assert_eq!(config.min_lines, 1);
        assert!(!config.one_based);
        assert!(config.extensions.is_empty());
    }

    #[test]
    fn test_fold_options_match_default() {
        assert_eq!(Config::default().fold_options(), FoldOptions::default());
    }

    #[test]
    fn test_config_apply_partial() {
        let mut base = Config::default();

        let partial = PartialConfig {
            min_lines: Some(3),
            one_based: Some(true),
            ..Default::default()
        };

        base.apply_partial(&partial);
        assert_eq!(base.min_lines, 3);
        assert!(base.one_based);
        // Unset fields keep their defaults
        assert!(base.exclude_closing_line);
        assert!(base.fold_comments);
    }

    #[test]
    fn test_config_apply_partial_preserves_unset() {
        let mut base = Config {
            fold_comments: false,
            ..Default::default()
        };

        let partial = PartialConfig {
            min_lines: Some(2),
            ..Default::default()
        };

        base.apply_partial(&partial);
        assert!(!base.fold_comments);
        assert_eq!(base.min_lines, 2);
    }

    #[test]
    fn test_config_apply_partial_extensions_merge() {
        let mut base = Config {
            extensions: vec!["module".to_string()],
            ..Default::default()
        };
        let partial = PartialConfig {
            extensions: vec!["module".to_string(), "tpl".to_string()],
            ..Default::default()
        };
        base.apply_partial(&partial);
        assert_eq!(base.extensions, vec!["module", "tpl"]);
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phpfold.toml");
        std::fs::write(&path, "fold_comments = false\nmin_lines = 4\n").unwrap();

        let config = Config::from_toml_file(&path).unwrap();
        assert!(!config.fold_comments);
        assert_eq!(config.min_lines, 4);
        assert!(config.exclude_closing_line);
    }

    #[test]
    fn test_from_toml_file_rejects_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phpfold.toml");
        std::fs::write(&path, "indent = 4\n").unwrap();

        assert!(Config::from_toml_file(&path).is_err());
    }

    #[test]
    fn test_discover_nested_configs() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("app").join("src");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join("phpfold.toml"), "min_lines = 2\none_based = true\n")
            .unwrap();
        std::fs::write(nested.join("phpfold.toml"), "min_lines = 5\n").unwrap();
        let file = nested.join("index.php");
        std::fs::write(&file, "<?php\n").unwrap();

        let discovered = Config::discover_config_files(&file);
        let root_config = root.path().join("phpfold.toml");
        let nested_config = nested.join("phpfold.toml");
        let root_pos = discovered.iter().position(|p| *p == root_config).unwrap();
        let nested_pos = discovered.iter().position(|p| *p == nested_config).unwrap();
        assert!(root_pos < nested_pos);

        // Only the two files we wrote take part in the merge
        let config = Config::from_files(&[root_config, nested_config]);
        assert_eq!(config.min_lines, 5);
        assert!(config.one_based);
    }

    #[test]
    fn test_from_files_skips_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&bad, "min_lines = \"many\"").unwrap();
        std::fs::write(&good, "fold_comments = false").unwrap();

        let config = Config::from_files(&[bad, good]);
        assert!(!config.fold_comments);
        assert_eq!(config.min_lines, 1);
    }

    #[test]
    fn test_from_files_empty_is_default() {
        assert_eq!(Config::from_files(&[]), Config::default());
    }

    #[test]
    fn test_validate_default_config() {
        assert!(
            Config::default().validate().is_none(),
            "Default config should be valid"
        );
    }

    #[test]
    fn test_validate_min_lines_zero() {
        let config = Config {
            min_lines: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap().contains("min_lines"));
    }

    #[test]
    fn test_validate_min_lines_too_large() {
        let config = Config {
            min_lines: 1_000_000,
            ..Default::default()
        };
        assert!(config.validate().is_some());
    }

    #[test]
    fn test_validate_empty_extension() {
        let config = Config {
            extensions: vec![".".to_string()],
            ..Default::default()
        };
        assert!(config.validate().unwrap().contains("extension"));
    }
}

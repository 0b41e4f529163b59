//! Project configuration management for `routetree.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── routes     # [routes]
//! │   └── migrate    # [migrate]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # ProjectConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section             | Purpose                                        |
//! |---------------------|------------------------------------------------|
//! | `[routes]`          | App dir, convention, markers, ignore globs     |
//! | `[[routes.roots]]`  | Route directories and their mount prefixes     |
//! | `[migrate]`         | Source/target directories, snapshot command    |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    BACKUP_SUFFIX, Convention, DEFAULT_TARGET_NAME, LEGACY_KEYS, MigrateConfig, RouteRoot,
    RoutesConfig, backup_dir_for,
};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use crate::{log, utils::path::normalize_path};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "routetree.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing routetree.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Absolute path to the config file; may not exist (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Legacy key aliases found in the file (internal use only)
    #[serde(skip)]
    pub legacy_keys: Vec<&'static str>,

    #[serde(default)]
    pub routes: RoutesConfig,

    #[serde(default)]
    pub migrate: MigrateConfig,
}

impl ProjectConfig {
    /// Load configuration, searching upward from the current directory.
    ///
    /// Without a config file every section takes its defaults and the
    /// project root is the current directory.
    pub fn load(config_name: &Path) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_from(config_name, &cwd)
    }

    /// Load configuration, searching upward from `start`.
    pub fn load_from(config_name: &Path, start: &Path) -> Result<Self> {
        let mut config = match find_config_file(config_name, start) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None => Self {
                config_path: start.join(config_name),
                ..Self::default()
            },
        };

        let root = config
            .config_path
            .parent()
            .map_or_else(|| start.to_path_buf(), Path::to_path_buf);
        config.finalize(&root);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let mut config: Self =
            serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
                ignored.push(path.to_string());
            })
            .map_err(ConfigError::Toml)?;
        config.legacy_keys = legacy_keys_in(content);
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Resolve every path against the project root.
    fn finalize(&mut self, root: &Path) {
        self.root = normalize_path(root);
        self.config_path = normalize_path(&self.config_path);
        self.routes.normalize(&self.root);
        self.migrate.normalize(&self.root);
    }

    /// Validate all sections, reporting every problem at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.routes.validate(&mut diag);
        self.migrate.validate(&mut diag);

        for key in &self.legacy_keys {
            diag.warn(
                FieldPath::new("routes"),
                format!("`{key}` is a legacy key, run `routetree migrate` to update it"),
            );
        }

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }
}

/// Legacy key aliases used under `[routes]` in a config document.
pub fn legacy_keys_in(content: &str) -> Vec<&'static str> {
    let Ok(table) = content.parse::<toml::Table>() else {
        return Vec::new();
    };
    let Some(routes) = table.get("routes").and_then(toml::Value::as_table) else {
        return Vec::new();
    };
    LEGACY_KEYS
        .iter()
        .filter(|(old, _)| routes.contains_key(*old))
        .map(|(old, _)| *old)
        .collect()
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse a config document.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> ProjectConfig {
    let (parsed, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(ProjectConfig::parse_with_ignored("[routes\napp_dir = \"app\"").is_err());
    }

    #[test]
    fn test_parse_full_config() {
        let config = test_parse_config(
            r#"
            [routes]
            app_dir = "src"
            convention = "legacy"
            base_path = "/shop"
            ignore = ["**/*.css"]

            [[routes.roots]]
            dir = "routes"

            [[routes.roots]]
            dir = "docs"
            prefix = "docs"

            [migrate]
            snapshot_command = ["npx", "remix", "routes"]
            "#,
        );
        assert_eq!(config.routes.app_dir, PathBuf::from("src"));
        assert_eq!(config.routes.convention, Convention::Legacy);
        assert_eq!(config.routes.roots.len(), 2);
        assert_eq!(config.routes.roots[1], RouteRoot::new("docs", "docs"));
        assert_eq!(config.migrate.snapshot_command.len(), 3);
        assert!(config.legacy_keys.is_empty());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[routes]\napp_dir = \"app\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = ProjectConfig::parse_with_ignored(content).unwrap();
        assert_eq!(config.routes.app_dir, PathBuf::from("app"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_legacy_keys_detected() {
        let config = test_parse_config("[routes]\nparam_prefix_char = \"$\"\n");
        assert_eq!(config.legacy_keys, vec!["param_prefix_char"]);
        assert!(legacy_keys_in("[routes]\nparam_marker = \"$\"\n").is_empty());
        assert!(legacy_keys_in("not toml [").is_empty());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config =
            ProjectConfig::load_from(Path::new("routetree-absent.toml"), dir.path()).unwrap();
        assert!(!config.config_path.is_file());
        assert_eq!(config.root, normalize_path(dir.path()));
        assert_eq!(config.routes.app_dir, config.root.join("app"));
        assert_eq!(config.migrate.source, config.root.join("app/routes"));
    }

    #[test]
    fn test_load_resolves_paths_against_config_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[routes]\napp_dir = \"web\"\n[migrate]\nsource = \"web/routes\"\n",
        )
        .unwrap();
        let nested = dir.path().join("web/routes");
        fs::create_dir_all(&nested).unwrap();

        let config = ProjectConfig::load_from(Path::new(CONFIG_FILE), &nested).unwrap();
        assert!(config.config_path.is_file());
        assert_eq!(config.root, normalize_path(dir.path()));
        assert_eq!(config.routes.app_dir, config.root.join("web"));
        assert_eq!(config.migrate.source, config.root.join("web/routes"));
    }

    #[test]
    fn test_load_reports_validation_errors() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[routes]\nbase_path = \"shop\"\nparam_marker = \"a\"\n",
        )
        .unwrap();
        let err = ProjectConfig::load_from(Path::new(CONFIG_FILE), dir.path()).unwrap_err();
        let diag = match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::Diagnostics(diag)) => diag,
            other => panic!("unexpected error: {other:?}"),
        };
        assert_eq!(diag.len(), 2);
    }
}

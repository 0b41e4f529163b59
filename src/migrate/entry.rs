//! The project entry file (`routetree.toml`).
//!
//! A legacy entry declares `convention = "legacy"` or spells options with
//! legacy key aliases. Migration rewrites it in place to the hybrid form;
//! the original text is kept next to it until the run commits.

use super::error::MigrateError;
use crate::config::{Convention, LEGACY_KEYS, ProjectConfig, backup_dir_for};
use crate::debug;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct EntryPoint {
    path: PathBuf,
    /// Whether the entry file exists; without one there is nothing to rewrite.
    exists: bool,
}

impl EntryPoint {
    /// Entry file at `path`, whatever its content.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let exists = path.is_file();
        Self { path, exists }
    }

    /// Locate the project's entry file and check that it is legacy.
    pub fn detect(project: &ProjectConfig) -> Result<Self, MigrateError> {
        let entry = Self::at(&project.config_path);
        if !entry.exists {
            debug!("entry"; "no {}, assuming legacy routes", entry.path.display());
            return Ok(entry);
        }

        let content = entry.read()?;
        if !is_legacy(&content).map_err(|source| MigrateError::Entry {
            path: entry.path.clone(),
            source,
        })? {
            return Err(MigrateError::AlreadyMigrated(entry.path));
        }
        Ok(entry)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Where the original text is kept while a migration is in flight.
    pub fn backup_path(&self) -> PathBuf {
        backup_dir_for(&self.path)
    }

    /// Rewrite the entry file to the hybrid form.
    ///
    /// Returns `false` when there is no entry file.
    pub fn rewrite(&self) -> Result<bool, MigrateError> {
        if !self.exists {
            return Ok(false);
        }
        let content = self.read()?;
        let rewritten = rewrite_entry(&content).map_err(|err| match err {
            RewriteError::Parse(source) => MigrateError::Entry {
                path: self.path.clone(),
                source,
            },
            RewriteError::Serialize(err) => MigrateError::EntrySerialize(err),
        })?;

        let backup = self.backup_path();
        fs::copy(&self.path, &backup).map_err(MigrateError::io(&backup))?;
        fs::write(&self.path, rewritten).map_err(MigrateError::io(&self.path))?;
        Ok(true)
    }

    /// Put the original text back, if a rewrite left a copy of it.
    ///
    /// Returns `false` when there was nothing to restore.
    pub fn restore(&self) -> Result<bool, MigrateError> {
        let backup = self.backup_path();
        if !backup.is_file() {
            return Ok(false);
        }
        fs::rename(&backup, &self.path).map_err(MigrateError::io(&self.path))?;
        Ok(true)
    }

    /// Drop the copy of the original text.
    pub fn commit(&self) -> Result<(), MigrateError> {
        let backup = self.backup_path();
        if backup.is_file() {
            fs::remove_file(&backup).map_err(MigrateError::io(&backup))?;
        }
        Ok(())
    }

    fn read(&self) -> Result<String, MigrateError> {
        fs::read_to_string(&self.path).map_err(MigrateError::io(&self.path))
    }
}

#[derive(Debug)]
enum RewriteError {
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

/// Whether an entry document uses the legacy convention.
fn is_legacy(content: &str) -> Result<bool, toml::de::Error> {
    let table: toml::Table = content.parse()?;
    let Some(routes) = table.get("routes").and_then(toml::Value::as_table) else {
        return Ok(false);
    };
    let declared = routes.get("convention").and_then(toml::Value::as_str)
        == Some(Convention::Legacy.as_str());
    let aliased = LEGACY_KEYS.iter().any(|(old, _)| routes.contains_key(*old));
    Ok(declared || aliased)
}

/// Translate a legacy entry document: legacy keys take their current
/// names and the convention becomes hybrid.
fn rewrite_entry(content: &str) -> Result<String, RewriteError> {
    let mut table: toml::Table = content.parse().map_err(RewriteError::Parse)?;

    let routes = table
        .entry("routes")
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    if let Some(routes) = routes.as_table_mut() {
        for (old, new) in LEGACY_KEYS {
            if let Some(value) = routes.remove(old) {
                // an explicit current key wins over its alias
                routes.entry(new).or_insert(value);
            }
        }
        routes.insert(
            "convention".into(),
            toml::Value::String(Convention::Hybrid.as_str().into()),
        );
    }

    toml::to_string(&table).map_err(RewriteError::Serialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoutesConfig;
    use tempfile::TempDir;

    const LEGACY: &str = r#"
[routes]
convention = "legacy"
param_prefix_char = "%"
ignored_route_files = ["**/*.css"]

[migrate]
source = "app/routes"
"#;

    #[test]
    fn test_is_legacy() {
        assert!(is_legacy(LEGACY).unwrap());
        assert!(is_legacy("[routes]\nnested_directory_char = \"~\"\n").unwrap());
        assert!(!is_legacy("[routes]\nconvention = \"hybrid\"\n").unwrap());
        assert!(!is_legacy("").unwrap());
        assert!(is_legacy("[routes\n").is_err());
    }

    #[test]
    fn test_rewrite_renames_keys() {
        let rewritten = rewrite_entry(LEGACY).unwrap();
        let table: toml::Table = rewritten.parse().unwrap();
        let routes: RoutesConfig = table["routes"].clone().try_into().unwrap();
        assert_eq!(routes.convention, Convention::Hybrid);
        assert_eq!(routes.param_marker, '%');
        assert_eq!(routes.ignore, vec!["**/*.css".to_string()]);
        assert!(!rewritten.contains("param_prefix_char"));
        assert!(!is_legacy(&rewritten).unwrap());
        assert_eq!(table["migrate"]["source"].as_str(), Some("app/routes"));
    }

    #[test]
    fn test_rewrite_keeps_explicit_key() {
        let rewritten =
            rewrite_entry("[routes]\nparam_marker = \"$\"\nparam_prefix_char = \"%\"\n").unwrap();
        let table: toml::Table = rewritten.parse().unwrap();
        assert_eq!(table["routes"]["param_marker"].as_str(), Some("$"));
    }

    #[test]
    fn test_rewrite_and_restore() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routetree.toml");
        fs::write(&path, LEGACY).unwrap();

        let entry = EntryPoint::at(&path);
        assert!(entry.rewrite().unwrap());
        assert!(entry.backup_path().is_file());
        assert!(!is_legacy(&fs::read_to_string(&path).unwrap()).unwrap());

        assert!(entry.restore().unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), LEGACY);
        assert!(!entry.restore().unwrap());
    }

    #[test]
    fn test_missing_entry_is_noop() {
        let dir = TempDir::new().unwrap();
        let entry = EntryPoint::at(dir.path().join("routetree.toml"));
        assert!(!entry.exists());
        assert!(!entry.rewrite().unwrap());
        entry.commit().unwrap();
    }

    #[test]
    fn test_detect_refuses_hybrid_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routetree.toml");
        fs::write(&path, "[routes]\nconvention = \"hybrid\"\n").unwrap();
        let project = ProjectConfig {
            config_path: path,
            ..Default::default()
        };
        assert!(matches!(
            EntryPoint::detect(&project),
            Err(MigrateError::AlreadyMigrated(_))
        ));
    }
}

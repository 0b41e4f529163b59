//! `[migrate]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [migrate]
//! source = "app/routes"                 # Route directory to migrate
//! target = "app/new-routes"             # Staging directory (default: sibling `new-routes`)
//! snapshot_command = ["npx", "remix", "routes"]   # Empty: built-in listing
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::{resolve_path, sibling};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default name of the staging directory, next to the source.
pub const DEFAULT_TARGET_NAME: &str = "new-routes";

/// Suffix appended to the source directory name for its backup.
pub const BACKUP_SUFFIX: &str = ".routetree-backup";

/// `[migrate]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrateConfig {
    /// Route directory to migrate; absolute after loading.
    pub source: PathBuf,

    /// Staging directory; absolute after loading.
    pub target: Option<PathBuf>,

    /// Command printing the host router's route listing.
    pub snapshot_command: Vec<String>,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            source: "app/routes".into(),
            target: None,
            snapshot_command: Vec::new(),
        }
    }
}

pub struct MigrateFields {
    pub source: FieldPath,
    pub target: FieldPath,
    pub snapshot_command: FieldPath,
}

impl MigrateConfig {
    pub const FIELDS: MigrateFields = MigrateFields {
        source: FieldPath::new("migrate.source"),
        target: FieldPath::new("migrate.target"),
        snapshot_command: FieldPath::new("migrate.snapshot_command"),
    };

    /// Resolve paths against the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.source = resolve_path(&self.source, root);
        self.target = self
            .target
            .take()
            .filter(|t| !t.as_os_str().is_empty())
            .map(|t| resolve_path(&t, root));
    }

    /// Staging directory for the migrated tree.
    pub fn target_dir(&self) -> PathBuf {
        self.target
            .clone()
            .unwrap_or_else(|| sibling(&self.source, DEFAULT_TARGET_NAME))
    }

    /// Backup location of the source directory during the swap.
    pub fn backup_dir(&self) -> PathBuf {
        backup_dir_for(&self.source)
    }

    /// Validate the section.
    ///
    /// # Checks
    /// - `target` differs from `source`
    /// - `snapshot_command[0]` is an installed executable
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.target_dir() == self.source {
            diag.error(
                Self::FIELDS.target,
                format!("{} must differ from {}", Self::FIELDS.target, Self::FIELDS.source),
            );
        }

        if let Some(cmd) = self.snapshot_command.first()
            && which::which(cmd).is_err()
        {
            diag.error_with_hint(
                Self::FIELDS.snapshot_command,
                format!("`{cmd}` not found"),
                format!(
                    "install the command or clear {} to use the built-in listing",
                    Self::FIELDS.snapshot_command
                ),
            );
        }
    }
}

/// `<source>.routetree-backup`, next to `source`.
pub fn backup_dir_for(source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    sibling(source, &format!("{name}{BACKUP_SUFFIX}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_target_is_sibling() {
        let mut config = MigrateConfig::default();
        config.normalize(Path::new("/proj"));
        assert_eq!(config.source, PathBuf::from("/proj/app/routes"));
        assert_eq!(config.target_dir(), PathBuf::from("/proj/app/new-routes"));
        assert_eq!(
            config.backup_dir(),
            PathBuf::from("/proj/app/routes.routetree-backup")
        );
    }

    #[test]
    fn test_empty_target_means_default() {
        let mut config: MigrateConfig = toml::from_str("target = \"\"").unwrap();
        config.normalize(Path::new("/proj"));
        assert!(config.target.is_none());
    }

    #[test]
    fn test_target_equal_to_source_rejected() {
        let config = MigrateConfig {
            source: "/proj/app/routes".into(),
            target: Some("/proj/app/routes".into()),
            snapshot_command: Vec::new(),
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn test_missing_snapshot_command_rejected() {
        let config = MigrateConfig {
            snapshot_command: vec!["routetree-no-such-command".into()],
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.errors()[0].field, MigrateConfig::FIELDS.snapshot_command);
    }
}

//! Migration errors.

use crate::route::RouteError;
use std::path::PathBuf;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("`{}` is not inside a git repository", path.display())]
    NotARepository {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("repository at `{}` has no working tree", .0.display())]
    OutsideWorkingTree(PathBuf),

    #[error("git status failed")]
    Git(#[source] BoxError),

    #[error("uncommitted changes under the migrated paths:\n{}", .0.join("\n"))]
    DirtyWorkingTree(Vec<String>),

    #[error("route directory `{}` does not exist", .0.display())]
    MissingSource(PathBuf),

    #[error("target directory `{}` already exists", .0.display())]
    TargetExists(PathBuf),

    #[error("backup directory `{}` already exists, run `routetree rollback` first", .0.display())]
    BackupExists(PathBuf),

    #[error("`{}` already uses the hybrid convention", .0.display())]
    AlreadyMigrated(PathBuf),

    #[error("`{first}` and `{second}` both map to `{target}`")]
    MappingConflict {
        target: String,
        first: String,
        second: String,
    },

    #[error("route `{0}` has no name of its own under the new convention")]
    Unplaceable(String),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("route listing failed: {0}")]
    Snapshot(String),

    #[error("route table changed during migration:\n{diff}")]
    VerificationFailed { diff: String },

    #[error("failed to parse entry file `{}`", path.display())]
    Entry {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write entry file")]
    EntrySerialize(#[from] toml::ser::Error),

    #[error("IO error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MigrateError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    pub(crate) fn git(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Git(Box::new(err))
    }
}

//! Working tree cleanliness gate.
//!
//! A migration only runs when the source directory and the entry file have
//! no uncommitted changes, so a failed run can always be discarded with git.

use super::error::MigrateError;
use crate::debug;
use crate::utils::path::{normalize_path, to_slash};
use std::path::{Path, PathBuf};

/// Reports uncommitted changes below a set of paths.
pub trait WorkingTree {
    /// Changed, added or untracked entries under any of `paths`, as
    /// repository-relative slash paths.
    fn changes(&self, paths: &[&Path]) -> Result<Vec<String>, MigrateError>;
}

/// Git working tree discovered from a directory.
pub struct GitWorkingTree {
    repo: gix::Repository,
    workdir: PathBuf,
}

impl GitWorkingTree {
    /// Discover the repository containing `path`.
    pub fn discover(path: &Path) -> Result<Self, MigrateError> {
        let repo = gix::discover(path).map_err(|err| MigrateError::NotARepository {
            path: path.to_path_buf(),
            source: Box::new(err),
        })?;
        let workdir = repo
            .workdir()
            .map(normalize_path)
            .ok_or_else(|| MigrateError::OutsideWorkingTree(path.to_path_buf()))?;
        Ok(Self { repo, workdir })
    }

    /// Path relative to the working tree root; `""` is the whole tree.
    fn relative(&self, path: &Path) -> Result<String, MigrateError> {
        normalize_path(path)
            .strip_prefix(&self.workdir)
            .map(to_slash)
            .map_err(|_| MigrateError::OutsideWorkingTree(path.to_path_buf()))
    }
}

impl WorkingTree for GitWorkingTree {
    fn changes(&self, paths: &[&Path]) -> Result<Vec<String>, MigrateError> {
        let scopes = paths
            .iter()
            .map(|p| self.relative(p))
            .collect::<Result<Vec<_>, _>>()?;

        let status = self
            .repo
            .status(gix::progress::Discard)
            .map_err(MigrateError::git)?
            .into_iter(Vec::<gix::bstr::BString>::new())
            .map_err(MigrateError::git)?;

        let mut changes = Vec::new();
        for item in status {
            let item = item.map_err(MigrateError::git)?;
            let location = item.location().to_string();
            if scopes.iter().any(|scope| within(&location, scope)) {
                changes.push(location);
            }
        }
        changes.sort();
        changes.dedup();

        debug!("git"; "{} changes under {:?}", changes.len(), scopes);
        Ok(changes)
    }
}

/// Whether a status location touches `scope`.
///
/// Untracked folders are reported collapsed (`app/`), so a location that
/// contains the scope counts too.
fn within(location: &str, scope: &str) -> bool {
    let location = location.trim_end_matches('/');
    scope.is_empty()
        || location == scope
        || location
            .strip_prefix(scope)
            .is_some_and(|rest| rest.starts_with('/'))
        || scope
            .strip_prefix(location)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Working tree with a fixed change list.
#[cfg(test)]
pub struct FakeTree(pub Vec<String>);

#[cfg(test)]
impl WorkingTree for FakeTree {
    fn changes(&self, _paths: &[&Path]) -> Result<Vec<String>, MigrateError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_within_scope() {
        assert!(within("app/routes/index.tsx", "app/routes"));
        assert!(within("app/routes", "app/routes"));
        assert!(within("app/", "app/routes"));
        assert!(within("anything", ""));
        assert!(!within("app/routes-old/x.tsx", "app/routes"));
        assert!(!within("app/root.tsx", "app/routes"));
    }

    #[test]
    fn test_discover_outside_repository() {
        let dir = TempDir::new().unwrap();
        // a fresh temp dir may still sit below a repository on some hosts
        if gix::discover(dir.path()).is_err() {
            assert!(matches!(
                GitWorkingTree::discover(dir.path()),
                Err(MigrateError::NotARepository { .. })
            ));
        }
    }

    #[test]
    fn test_untracked_files_in_scope() {
        let dir = TempDir::new().unwrap();
        gix::init(dir.path()).unwrap();
        let routes = dir.path().join("app/routes");
        fs::create_dir_all(&routes).unwrap();
        fs::write(routes.join("index.tsx"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let tree = GitWorkingTree::discover(&routes).unwrap();
        let changes = tree.changes(&[routes.as_path()]).unwrap();
        assert!(!changes.is_empty());
        assert!(changes.iter().all(|c| c.starts_with("app")), "{changes:?}");
        assert!(!changes.iter().any(|c| c == "notes.txt"));
    }

    #[test]
    fn test_path_outside_working_tree() {
        let repo = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        gix::init(repo.path()).unwrap();

        let tree = GitWorkingTree::discover(repo.path()).unwrap();
        assert!(matches!(
            tree.changes(&[other.path()]),
            Err(MigrateError::OutsideWorkingTree(_))
        ));
    }
}

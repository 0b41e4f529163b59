//! Directory traversal.

use super::error::RouteError;
use crate::utils::path::to_slash;
use jwalk::{Parallelism, WalkDir};
use std::path::Path;

/// Enumerates the files below a route root.
pub trait Walker {
    /// Call `visit` with every file under `root`, as a `/`-separated path
    /// relative to `root`. No ordering is promised.
    fn visit(&self, root: &Path, visit: &mut dyn FnMut(&str)) -> Result<(), RouteError>;
}

/// Filesystem walker backed by jwalk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsWalker {
    pub follow_links: bool,
}

impl FsWalker {
    pub const fn new(follow_links: bool) -> Self {
        Self { follow_links }
    }
}

impl Walker for FsWalker {
    fn visit(&self, root: &Path, visit: &mut dyn FnMut(&str)) -> Result<(), RouteError> {
        if !root.is_dir() {
            return Err(RouteError::MissingRoot(root.to_path_buf()));
        }

        let walker = WalkDir::new(root)
            .follow_links(self.follow_links)
            .skip_hidden(false)
            .parallelism(Parallelism::Serial);

        for entry in walker {
            let entry = entry.map_err(|err| RouteError::Walk {
                path: root.to_path_buf(),
                source: Box::new(err),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if let Ok(relative) = path.strip_prefix(root) {
                visit(&to_slash(relative));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn visit_all(walker: &FsWalker, root: &Path) -> Vec<String> {
        let mut files = Vec::new();
        walker.visit(root, &mut |rel| files.push(rel.to_string())).unwrap();
        files.sort();
        files
    }

    #[test]
    fn test_visits_nested_and_hidden_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("admin/+components")).unwrap();
        fs::write(dir.path().join("index.tsx"), "").unwrap();
        fs::write(dir.path().join(".hidden.tsx"), "").unwrap();
        fs::write(dir.path().join("admin/+components/card.tsx"), "").unwrap();

        let files = visit_all(&FsWalker::default(), dir.path());
        assert_eq!(files, [".hidden.tsx", "admin/+components/card.tsx", "index.tsx"]);
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = FsWalker::default()
            .visit(&dir.path().join("routes"), &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, RouteError::MissingRoot(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_follow_links_flag() {
        let dir = TempDir::new().unwrap();
        let outside = dir.path().join("shared");
        let root = dir.path().join("routes");
        fs::create_dir_all(&outside).unwrap();
        fs::create_dir_all(&root).unwrap();
        fs::write(outside.join("about.tsx"), "").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("shared")).unwrap();

        assert!(visit_all(&FsWalker::new(false), &root).is_empty());
        assert_eq!(visit_all(&FsWalker::new(true), &root), ["shared/about.tsx"]);
    }
}

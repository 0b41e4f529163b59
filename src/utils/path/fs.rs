//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `resolve_path` - resolve relative paths against the project root
//! - `sibling` - a path next to another one (backup and staging dirs)

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) if s.starts_with('~') => PathBuf::from(shellexpand::tilde(s).into_owned()),
        _ => path.to_path_buf(),
    }
}

/// Resolve a user-supplied path against a base directory.
///
/// Always returns an absolute path. `~` is expanded first; absolute paths
/// are used as-is.
#[inline]
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    let path = expand_tilde(path);
    if path.is_absolute() {
        return normalize_path(&path);
    }
    normalize_path(&base.join(path))
}

/// Path of a sibling entry named `name` next to `path`.
///
/// `sibling("/app/routes", "new-routes")` -> `/app/new-routes`
pub fn sibling(path: &Path, name: &str) -> PathBuf {
    path.parent()
        .map_or_else(|| PathBuf::from(name), |parent| parent.join(name))
}

//! Forward-slash path strings.
//!
//! Route ids, names and mapping plans are always expressed with `/`
//! separators regardless of the host platform.

use std::path::{Component, Path};

/// Join the normal components of a relative path with `/`.
///
/// `.` components are dropped. Non UTF-8 components are converted lossily.
pub fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        if let Component::Normal(part) = component {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&part.to_string_lossy());
        }
    }
    out
}

/// Split the extension off the final component of a slash path.
///
/// Only the last `.` of the file name counts; dots in folder names are kept.
///
/// ```ignore
/// split_extension("users/$id.edit.tsx") == ("users/$id.edit", Some("tsx"))
/// split_extension("README") == ("README", None)
/// ```
pub fn split_extension(path: &str) -> (&str, Option<&str>) {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            let dot = name_start + dot;
            (&path[..dot], Some(&path[dot + 1..]))
        }
        _ => (path, None),
    }
}

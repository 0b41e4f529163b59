//! URL path construction from parsed segments.

use super::convention::RuleSet;

/// Build a record's full URL path.
///
/// The index marker contributes no path, pathless segments are skipped and
/// the no-nest suffix is dropped. `None` means the record adds no path of
/// its own, which keeps "root route" apart from "no path".
pub fn build_path(
    rules: &RuleSet,
    semantic: &[String],
    raw: &[String],
    is_index: bool,
    base_path: &str,
) -> Option<String> {
    let take = if is_index {
        semantic.len().saturating_sub(1)
    } else {
        semantic.len()
    };

    let base = base_path.trim_matches('/');
    let mut parts: Vec<&str> = Vec::with_capacity(take + 1);
    if !base.is_empty() {
        parts.push(base);
    }

    for (segment, spelled) in semantic.iter().zip(raw).take(take) {
        if rules.is_pathless(segment, spelled) {
            continue;
        }
        let segment = rules.strip_no_nest(segment, spelled);
        if !segment.is_empty() {
            parts.push(segment);
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// A child's path relative to its parent's full path.
///
/// A child whose path does not extend the parent's keeps its full path.
pub fn relative_path(full: Option<&str>, parent: Option<&str>) -> Option<String> {
    let full = full?;
    let Some(parent) = parent else {
        return Some(full.to_string());
    };
    if full == parent {
        return None;
    }
    match full.strip_prefix(parent).and_then(|rest| rest.strip_prefix('/')) {
        Some(rest) => Some(rest.to_string()),
        None => Some(full.to_string()),
    }
}

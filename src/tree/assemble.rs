//! Assembly order and manifest construction.

use super::manifest::{ManifestBuilder, RouteManifest};
use crate::route::{RouteError, RouteRecord, relative_path};
use crate::utils::path::to_slash;
use rustc_hash::FxHashMap;

/// Shallow before deep, non-index before index, stronger before weaker,
/// then by id.
pub fn sort_records(records: &mut [RouteRecord]) {
    records.sort_by(|a, b| {
        a.segments
            .len()
            .cmp(&b.segments.len())
            .then(a.is_index.cmp(&b.is_index))
            .then(b.kind.score().cmp(&a.kind.score()))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Build the manifest of resolved, sorted records.
///
/// Each route's path is its full path relative to its parent's.
pub fn assemble(records: &[RouteRecord]) -> Result<RouteManifest, RouteError> {
    let full_paths: FxHashMap<&str, Option<&str>> = records
        .iter()
        .map(|r| (r.id.as_str(), r.full_path.as_deref()))
        .collect();

    let mut builder = ManifestBuilder::new();
    for record in records {
        let parent_path = record
            .parent_id
            .as_deref()
            .and_then(|parent| full_paths.get(parent).copied().flatten());
        let file = record.file.as_deref().map(to_slash);

        builder
            .route(&record.id, file.as_deref())
            .maybe_path(relative_path(record.full_path.as_deref(), parent_path))
            .index(record.is_index)
            .maybe_parent(record.parent_id.clone());
    }
    builder.build()
}

//! Mapping plan: where every file of a legacy route directory goes under
//! the hybrid convention.
//!
//! Placement follows the legacy tree, not the legacy file names:
//!
//! | Legacy node                       | Hybrid file                      |
//! |-----------------------------------|----------------------------------|
//! | route with children               | `admin+/_layout.tsx`             |
//! | ... with a folder parent below it | `admin/_layout.tsx`              |
//! | index route                       | `admin+/_index.tsx`, `_index.tsx` |
//! | leaf route                        | `admin+/users.tsx`, `a.b.tsx`    |
//! | folder parent (no file)           | plain folder `api/`              |
//!
//! Children of a real parent live in its `+` folder unless a folder parent
//! is synthesized somewhere below it: flat folders stop synthesis, so that
//! branch keeps plain folders.

use super::error::MigrateError;
use crate::config::RoutesConfig;
use crate::route::{HYBRID_RESERVED_NAMES, RouteKind, RouteRecord, Walker};
use crate::tree::compile_records;
use crate::utils::path::{split_extension, to_slash};
use rustc_hash::{FxHashMap, FxHashSet};

/// One file move, as slash paths relative to the route directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default)]
pub struct MappingPlan {
    /// Every file under the source directory, route modules first.
    pub entries: Vec<MappingEntry>,
    /// Module specifiers (app-relative, no extension) of moved routes, as
    /// `(old, new)`.
    pub specifiers: Vec<(String, String)>,
}

impl MappingPlan {
    /// Plan the migration of the single root of a legacy configuration.
    pub fn build(routes: &RoutesConfig, walker: &dyn Walker) -> Result<Self, MigrateError> {
        let Some(root) = routes.roots.first() else {
            return Ok(Self::default());
        };
        let root_name = to_slash(&root.dir);

        let records = compile_records(routes, walker)?;
        let mut placement = Placement::new(&records, routes.colocation_marker);
        placement.place(None, "")?;

        let mut plan = Self::default();
        let mut targets: FxHashMap<String, String> = FxHashMap::default();
        let mut moved: FxHashSet<String> = FxHashSet::default();

        for (record, target) in placement.placed {
            let Some(file) = &record.file else {
                continue;
            };
            let source = file
                .strip_prefix(&root.dir)
                .map(to_slash)
                .unwrap_or_else(|_| to_slash(file));

            plan.specifiers.push((
                specifier(&root_name, &source),
                specifier(&root_name, &target),
            ));
            moved.insert(source.clone());
            plan.add(&mut targets, source, target)?;
        }

        let mut files = Vec::new();
        walker.visit(&routes.root_dir(root), &mut |file| files.push(file.to_string()))?;
        files.sort();
        for file in files {
            if !moved.contains(&file) {
                plan.add(&mut targets, file.clone(), file)?;
            }
        }
        Ok(plan)
    }

    fn add(
        &mut self,
        targets: &mut FxHashMap<String, String>,
        source: String,
        target: String,
    ) -> Result<(), MigrateError> {
        if let Some(first) = targets.get(&target) {
            return Err(MigrateError::MappingConflict {
                target,
                first: first.clone(),
                second: source,
            });
        }
        targets.insert(target.clone(), source.clone());
        self.entries.push(MappingEntry { source, target });
        Ok(())
    }

    /// Number of entries whose path changes.
    pub fn moved(&self) -> usize {
        self.entries.iter().filter(|e| e.source != e.target).count()
    }
}

fn specifier(root: &str, file: &str) -> String {
    let (stem, _) = split_extension(file);
    if root.is_empty() {
        stem.to_string()
    } else {
        format!("{root}/{stem}")
    }
}

struct Placement<'a> {
    children: FxHashMap<Option<&'a str>, Vec<&'a RouteRecord>>,
    marker: char,
    placed: Vec<(&'a RouteRecord, String)>,
}

impl<'a> Placement<'a> {
    fn new(records: &'a [RouteRecord], marker: char) -> Self {
        let mut children: FxHashMap<Option<&str>, Vec<&RouteRecord>> = FxHashMap::default();
        for record in records {
            children
                .entry(record.parent_id.as_deref())
                .or_default()
                .push(record);
        }
        Self {
            children,
            marker,
            placed: Vec::new(),
        }
    }

    /// Place the children of `parent` inside `container` (`""` or a folder
    /// path ending in `/`).
    fn place(
        &mut self,
        parent: Option<&'a RouteRecord>,
        container: &str,
    ) -> Result<(), MigrateError> {
        let key = parent.map(|p| p.id.as_str());
        let Some(children) = self.children.get(&key).cloned() else {
            return Ok(());
        };
        let depth = parent.map_or(0, |p| p.segments.len());

        for child in children {
            let own = &child.raw_segments;
            // the index marker is spelled by the placement itself
            let end = if child.is_index {
                own.len().saturating_sub(1)
            } else {
                own.len()
            };
            let name = own
                .get(depth..end)
                .unwrap_or_default()
                .iter()
                .map(|raw| self.translate(raw))
                .collect::<Vec<_>>()
                .join(".");
            let ext = child
                .file
                .as_deref()
                .and_then(|f| f.extension())
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();

            if child.is_index {
                let file = if name.is_empty() {
                    format!("{container}_index{ext}")
                } else {
                    format!("{container}{name}._index{ext}")
                };
                self.placed.push((child, file));
                continue;
            }
            if name.is_empty() {
                return Err(MigrateError::Unplaceable(child.id.clone()));
            }

            if child.kind == RouteKind::Synthetic {
                self.place(Some(child), &format!("{container}{name}/"))?;
            } else if self.children.contains_key(&Some(child.id.as_str())) {
                let folder = if self.synthetic_below(&child.id) {
                    format!("{container}{name}/")
                } else {
                    format!("{container}{name}{}/", self.marker)
                };
                self.placed.push((child, format!("{folder}_layout{ext}")));
                self.place(Some(child), &folder)?;
            } else {
                self.placed.push((child, format!("{container}{name}{ext}")));
            }
        }
        Ok(())
    }

    fn synthetic_below(&self, id: &str) -> bool {
        self.children.get(&Some(id)).is_some_and(|children| {
            children
                .iter()
                .any(|c| c.kind == RouteKind::Synthetic || self.synthetic_below(&c.id))
        })
    }

    /// Respell a legacy raw segment so the hybrid parser reads it the same.
    ///
    /// `__auth` -> `_auth`, `_private` -> `[_]private`, `route` -> `[route]`,
    /// `users_` -> `users[_]`, `admin+` -> `admin[+]`.
    fn translate(&self, raw: &str) -> String {
        if HYBRID_RESERVED_NAMES.contains(&raw) {
            return format!("[{raw}]");
        }

        let escaped_marker = format!("[{}]", self.marker);
        let mut out = String::with_capacity(raw.len() + 6);
        let body = if let Some(rest) = raw.strip_prefix("__") {
            out.push('_');
            rest
        } else if let Some(rest) = raw.strip_prefix('_') {
            out.push_str("[_]");
            rest
        } else {
            raw
        };

        if let Some(rest) = body.strip_suffix('_') {
            out.push_str(rest);
            out.push_str("[_]");
        } else if let Some(rest) = body.strip_suffix(self.marker) {
            out.push_str(rest);
            out.push_str(&escaped_marker);
        } else {
            out.push_str(body);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Convention;
    use crate::route::ListWalker;

    fn legacy() -> RoutesConfig {
        RoutesConfig {
            convention: Convention::Legacy,
            ..Default::default()
        }
    }

    fn plan(files: &[&'static str]) -> MappingPlan {
        MappingPlan::build(&legacy(), &ListWalker(files.to_vec())).unwrap()
    }

    fn target<'p>(plan: &'p MappingPlan, source: &str) -> &'p str {
        plan.entries
            .iter()
            .find(|e| e.source == source)
            .map(|e| e.target.as_str())
            .unwrap_or_else(|| panic!("{source} not planned"))
    }

    #[test]
    fn test_parents_become_flat_folders() {
        let plan = plan(&[
            "index.tsx",
            "about.tsx",
            "admin.tsx",
            "admin/users.tsx",
            "admin/index.tsx",
            "api/users.ts",
            "api/posts.ts",
            "styles.css",
            "admin/+utils/format.ts",
        ]);
        assert_eq!(target(&plan, "index.tsx"), "_index.tsx");
        assert_eq!(target(&plan, "about.tsx"), "about.tsx");
        assert_eq!(target(&plan, "admin.tsx"), "admin+/_layout.tsx");
        assert_eq!(target(&plan, "admin/users.tsx"), "admin+/users.tsx");
        assert_eq!(target(&plan, "admin/index.tsx"), "admin+/_index.tsx");
        assert_eq!(target(&plan, "api/users.ts"), "api/users.ts");
        assert_eq!(target(&plan, "api/posts.ts"), "api/posts.ts");
        assert_eq!(target(&plan, "styles.css"), "styles.css");
        assert_eq!(target(&plan, "admin/+utils/format.ts"), "admin/+utils/format.ts");
        assert_eq!(plan.entries.len(), 9);
        assert_eq!(plan.moved(), 4);
    }

    #[test]
    fn test_folder_parent_below_keeps_plain_folders() {
        let plan = plan(&["admin.tsx", "admin/reports/daily.tsx"]);
        assert_eq!(target(&plan, "admin.tsx"), "admin/_layout.tsx");
        assert_eq!(target(&plan, "admin/reports/daily.tsx"), "admin/reports/daily.tsx");
    }

    #[test]
    fn test_dotted_children_stay_dotted() {
        let plan = plan(&["users.tsx", "users.$id.edit.tsx"]);
        assert_eq!(target(&plan, "users.tsx"), "users+/_layout.tsx");
        assert_eq!(target(&plan, "users.$id.edit.tsx"), "users+/$id.edit.tsx");
    }

    #[test]
    fn test_segments_are_respelled() {
        let plan = plan(&[
            "__auth.tsx",
            "__auth/login.tsx",
            "_private.tsx",
            "layout.tsx",
            "users_.tsx",
        ]);
        assert_eq!(target(&plan, "__auth.tsx"), "_auth+/_layout.tsx");
        assert_eq!(target(&plan, "__auth/login.tsx"), "_auth+/login.tsx");
        assert_eq!(target(&plan, "_private.tsx"), "[_]private.tsx");
        assert_eq!(target(&plan, "layout.tsx"), "[layout].tsx");
        assert_eq!(target(&plan, "users_.tsx"), "users[_].tsx");
    }

    #[test]
    fn test_colocated_files_copied_in_place() {
        let plan = plan(&["dashboard.tsx", "dashboard/+helpers.ts", "admin+/x.tsx"]);
        assert_eq!(target(&plan, "dashboard/+helpers.ts"), "dashboard/+helpers.ts");
        assert_eq!(target(&plan, "admin+/x.tsx"), "admin[+]/x.tsx");
    }

    #[test]
    fn test_specifiers() {
        let plan = plan(&["admin.tsx", "admin/users.tsx"]);
        assert!(plan.specifiers.contains(&(
            "routes/admin".to_string(),
            "routes/admin+/_layout".to_string()
        )));
        assert!(plan.specifiers.contains(&(
            "routes/admin/users".to_string(),
            "routes/admin+/users".to_string()
        )));
    }

    #[test]
    fn test_two_sources_one_target() {
        let err = MappingPlan::build(
            &legacy(),
            &ListWalker(vec!["a.tsx", "a/b.tsx", "a.b.tsx"]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MigrateError::MappingConflict { ref target, .. } if target == "a+/b.tsx"
        ));
    }

    #[test]
    fn test_route_errors_abort_planning() {
        let err = MappingPlan::build(&legacy(), &ListWalker(vec!["users/($).tsx"])).unwrap_err();
        assert!(matches!(err, MigrateError::Route(_)));
    }
}

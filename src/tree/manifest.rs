//! Route manifest: an insertion-ordered table of route definitions, and the
//! forest it turns into.
//!
//! ```ignore
//! let mut builder = ManifestBuilder::new();
//! builder.route("admin/_layout", Some("routes/admin/_layout.tsx")).path("admin");
//! builder
//!     .route("admin/dashboard", Some("routes/admin/dashboard.tsx"))
//!     .path("dashboard")
//!     .parent("admin/_layout");
//! let tree = builder.build()?.into_tree()?;
//! ```

use crate::route::RouteError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One route definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
    pub id: String,
    pub file: Option<String>,
    pub path: Option<String>,
    pub index: bool,
    /// `None` hangs the route off the implicit root.
    pub parent: Option<String>,
}

impl RouteDef {
    fn new(id: String, file: Option<String>) -> Self {
        Self {
            id,
            file,
            path: None,
            index: false,
            parent: None,
        }
    }

    pub fn path(&mut self, path: impl Into<String>) -> &mut Self {
        self.path = Some(path.into());
        self
    }

    pub fn maybe_path(&mut self, path: Option<String>) -> &mut Self {
        self.path = path;
        self
    }

    pub fn index(&mut self, index: bool) -> &mut Self {
        self.index = index;
        self
    }

    pub fn parent(&mut self, parent: impl Into<String>) -> &mut Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn maybe_parent(&mut self, parent: Option<String>) -> &mut Self {
        self.parent = parent;
        self
    }
}

/// Accumulates route definitions in order.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    routes: Vec<RouteDef>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route and return it for further settings.
    pub fn route(&mut self, id: impl Into<String>, file: Option<&str>) -> &mut RouteDef {
        let at = self.routes.len();
        self.routes
            .push(RouteDef::new(id.into(), file.map(str::to_string)));
        &mut self.routes[at]
    }

    /// Finish the manifest; ids must be unique.
    pub fn build(self) -> Result<RouteManifest, RouteError> {
        let mut index = FxHashMap::default();
        for (at, def) in self.routes.iter().enumerate() {
            if let Some(&first) = index.get(&def.id) {
                let first: &RouteDef = &self.routes[first];
                return Err(RouteError::DuplicateId {
                    id: def.id.clone(),
                    first: def_location(first),
                    second: def_location(def),
                });
            }
            index.insert(def.id.clone(), at);
        }
        Ok(RouteManifest {
            routes: self.routes,
            index,
        })
    }
}

fn def_location(def: &RouteDef) -> PathBuf {
    PathBuf::from(def.file.as_deref().unwrap_or(&def.id))
}

/// Route definitions by id, in insertion order.
#[derive(Debug, Clone)]
pub struct RouteManifest {
    routes: Vec<RouteDef>,
    index: FxHashMap<String, usize>,
}

impl RouteManifest {
    pub fn get(&self, id: &str) -> Option<&RouteDef> {
        self.index.get(id).map(|&at| &self.routes[at])
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteDef> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Turn the manifest into a forest, children in insertion order.
    ///
    /// Fails on unknown parents, on index parents, and on routes that
    /// cannot be reached from the root.
    pub fn into_tree(self) -> Result<Vec<RouteNode>, RouteError> {
        let mut top = Vec::new();
        let mut children: FxHashMap<usize, Vec<usize>> = FxHashMap::default();

        for (at, def) in self.routes.iter().enumerate() {
            let Some(parent_id) = &def.parent else {
                top.push(at);
                continue;
            };
            let Some(&parent) = self.index.get(parent_id) else {
                return Err(RouteError::UnknownParent {
                    parent: parent_id.clone(),
                    child: def.id.clone(),
                });
            };
            if self.routes[parent].index {
                return Err(RouteError::IndexParent {
                    parent: parent_id.clone(),
                    child: def.id.clone(),
                });
            }
            children.entry(parent).or_default().push(at);
        }

        let mut visited = vec![false; self.routes.len()];
        let tree: Vec<RouteNode> = top
            .into_iter()
            .map(|at| self.node(at, &children, &mut visited))
            .collect();

        if let Some(at) = visited.iter().position(|seen| !seen) {
            return Err(RouteError::Unreachable {
                id: self.routes[at].id.clone(),
            });
        }
        Ok(tree)
    }

    fn node(
        &self,
        at: usize,
        children: &FxHashMap<usize, Vec<usize>>,
        visited: &mut [bool],
    ) -> RouteNode {
        visited[at] = true;
        let def = &self.routes[at];
        let kids = children
            .get(&at)
            .map(|kids| {
                kids.iter()
                    .map(|&kid| self.node(kid, children, visited))
                    .collect()
            })
            .unwrap_or_default();

        RouteNode {
            id: def.id.clone(),
            file: def.file.clone(),
            path: def.path.clone(),
            index: def.index,
            children: kids,
        }
    }
}

/// A node of the emitted route tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub index: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_produces_tree() {
        let mut builder = ManifestBuilder::new();
        builder
            .route("admin/_layout", Some("routes/admin/_layout.tsx"))
            .path("admin");
        builder
            .route("admin/dashboard", Some("routes/admin/dashboard.tsx"))
            .path("dashboard")
            .parent("admin/_layout");
        builder.route("index", Some("routes/index.tsx")).index(true);

        let manifest = builder.build().unwrap();
        assert_eq!(manifest.len(), 3);
        assert_eq!(
            manifest.get("admin/dashboard").and_then(|d| d.parent.as_deref()),
            Some("admin/_layout")
        );

        let tree = manifest.into_tree().unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].path.as_deref(), Some("dashboard"));
        assert!(tree[1].index);
    }

    #[test]
    fn test_duplicate_id() {
        let mut builder = ManifestBuilder::new();
        builder.route("about", Some("routes/about.tsx"));
        builder.route("about", Some("routes/about.jsx"));
        assert!(matches!(
            builder.build(),
            Err(RouteError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_index_parent_rejected() {
        let mut builder = ManifestBuilder::new();
        builder.route("index", None).index(true);
        builder.route("child", None).parent("index");
        let err = builder.build().unwrap().into_tree().unwrap_err();
        assert!(matches!(err, RouteError::IndexParent { .. }));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut builder = ManifestBuilder::new();
        builder.route("child", None).parent("missing");
        let err = builder.build().unwrap().into_tree().unwrap_err();
        assert!(matches!(err, RouteError::UnknownParent { .. }));
    }

    #[test]
    fn test_cycle_is_unreachable() {
        let mut builder = ManifestBuilder::new();
        builder.route("a", None).parent("b");
        builder.route("b", None).parent("a");
        let err = builder.build().unwrap().into_tree().unwrap_err();
        assert!(matches!(err, RouteError::Unreachable { .. }));
    }

    #[test]
    fn test_node_serialization_skips_empty_fields() {
        let node = RouteNode {
            id: "index".into(),
            file: Some("routes/index.tsx".into()),
            path: None,
            index: true,
            children: Vec::new(),
        };
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"id":"index","file":"routes/index.tsx","index":true}"#);

        let back: RouteNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}

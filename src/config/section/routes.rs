//! `[routes]` section configuration.
//!
//! Describes where route modules live and which naming convention they use.
//!
//! # Example
//!
//! ```toml
//! [routes]
//! app_dir = "app"              # Route roots are relative to this
//! convention = "hybrid"        # hybrid | legacy
//! base_path = "/"              # Prepended to every route path
//! param_marker = "$"           # `$id` -> `:id`, lone `$` -> `*`
//! colocation_marker = "+"      # `+utils/` holds non-route files
//! ignore = ["**/*.css"]        # gitignore-style globs, relative to each root
//! follow_links = false
//!
//! [[routes.roots]]
//! dir = "routes"
//! prefix = ""                  # URL mount prefix for this root
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::resolve_path;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Key aliases accepted for configs written against the legacy convention,
/// as `(legacy name, current name)`.
pub const LEGACY_KEYS: [(&str, &str); 3] = [
    ("param_prefix_char", "param_marker"),
    ("nested_directory_char", "colocation_marker"),
    ("ignored_route_files", "ignore"),
];

/// Characters with fixed meaning in route file names.
const RESERVED_MARKERS: &[char] = &['[', ']', '(', ')', '.', '/', '\\', '_', '*', ':'];

/// Route file naming convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    /// Nested folders; `__` marks pathless segments.
    Legacy,
    /// Folders plus `+` flat folders, `_` pathless prefix, layout/route markers.
    #[default]
    Hybrid,
}

impl Convention {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Hybrid => "hybrid",
        }
    }
}

/// One directory of route modules and the URL prefix it is mounted at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRoot {
    /// Directory relative to `app_dir`.
    pub dir: PathBuf,
    /// URL mount prefix (`""` mounts at the base path).
    #[serde(default)]
    pub prefix: String,
}

impl RouteRoot {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }
}

/// `[routes]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Application directory; absolute after loading.
    pub app_dir: PathBuf,

    pub convention: Convention,

    /// URL base path, `/` for none.
    pub base_path: String,

    #[serde(alias = "param_prefix_char")]
    pub param_marker: char,

    #[serde(alias = "nested_directory_char")]
    pub colocation_marker: char,

    /// Gitignore-style globs matched against paths relative to each root.
    #[serde(alias = "ignored_route_files")]
    pub ignore: Vec<String>,

    /// When set, nested files must match this regex to be route modules.
    pub route_file_pattern: Option<String>,

    pub follow_links: bool,

    /// Accept `page` as a terminal route marker (hybrid only).
    pub page_marker: bool,

    /// Route module extensions, without the dot.
    pub extensions: Vec<String>,

    pub roots: Vec<RouteRoot>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            app_dir: "app".into(),
            convention: Convention::default(),
            base_path: "/".into(),
            param_marker: '$',
            colocation_marker: '+',
            ignore: Vec::new(),
            route_file_pattern: None,
            follow_links: false,
            page_marker: false,
            extensions: ["js", "jsx", "ts", "tsx", "md", "mdx"]
                .into_iter()
                .map(String::from)
                .collect(),
            roots: vec![RouteRoot::new("routes", "")],
        }
    }
}

/// Field paths of `[routes]`, for diagnostics.
pub struct RoutesFields {
    pub app_dir: FieldPath,
    pub base_path: FieldPath,
    pub param_marker: FieldPath,
    pub colocation_marker: FieldPath,
    pub ignore: FieldPath,
    pub route_file_pattern: FieldPath,
    pub extensions: FieldPath,
    pub roots: FieldPath,
}

impl RoutesConfig {
    pub const FIELDS: RoutesFields = RoutesFields {
        app_dir: FieldPath::new("routes.app_dir"),
        base_path: FieldPath::new("routes.base_path"),
        param_marker: FieldPath::new("routes.param_marker"),
        colocation_marker: FieldPath::new("routes.colocation_marker"),
        ignore: FieldPath::new("routes.ignore"),
        route_file_pattern: FieldPath::new("routes.route_file_pattern"),
        extensions: FieldPath::new("routes.extensions"),
        roots: FieldPath::new("routes.roots"),
    };

    /// Resolve `app_dir` against the project root and tidy mount prefixes.
    pub fn normalize(&mut self, root: &Path) {
        self.app_dir = resolve_path(&self.app_dir, root);
        for entry in &mut self.roots {
            entry.prefix = entry.prefix.trim_matches('/').to_string();
        }
    }

    /// Copy of this config that reads a single route directory.
    pub fn for_root(&self, dir: &Path) -> Self {
        let app_dir = dir.parent().map(Path::to_path_buf).unwrap_or_default();
        let name = dir.file_name().map(PathBuf::from).unwrap_or_default();
        Self {
            app_dir,
            roots: vec![RouteRoot::new(name, "")],
            ..self.clone()
        }
    }

    /// Copy of this config using another convention.
    pub fn with_convention(&self, convention: Convention) -> Self {
        Self {
            convention,
            ..self.clone()
        }
    }

    /// Absolute directory of a route root.
    pub fn root_dir(&self, entry: &RouteRoot) -> PathBuf {
        self.app_dir.join(&entry.dir)
    }

    /// Whether `ext` (without dot) names a route module.
    pub fn is_route_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext)
    }

    /// Validate the section.
    ///
    /// # Checks
    /// - markers are single symbols, distinct, and not reserved characters
    /// - `base_path` starts with `/`
    /// - `roots` is non-empty; each `dir` is relative and each root unique
    /// - mount prefixes are plain path text (no params, optionals or escapes)
    /// - `route_file_pattern` compiles, `extensions` is non-empty
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        Self::validate_marker(self.param_marker, Self::FIELDS.param_marker, diag);
        Self::validate_marker(self.colocation_marker, Self::FIELDS.colocation_marker, diag);
        if self.param_marker == self.colocation_marker {
            diag.error(
                Self::FIELDS.colocation_marker,
                format!(
                    "{} and {} must differ",
                    Self::FIELDS.param_marker,
                    Self::FIELDS.colocation_marker
                ),
            );
        }

        if !self.base_path.starts_with('/') {
            diag.error_with_hint(
                Self::FIELDS.base_path,
                format!("`{}` must start with `/`", self.base_path),
                "use \"/\" to mount routes at the site root",
            );
        }

        if let Some(pattern) = &self.route_file_pattern
            && let Err(err) = Regex::new(pattern)
        {
            diag.error(
                Self::FIELDS.route_file_pattern,
                format!("invalid regex: {err}"),
            );
        }

        if self.extensions.is_empty() {
            diag.error(Self::FIELDS.extensions, "at least one extension is required");
        }
        for ext in &self.extensions {
            if ext.starts_with('.') || ext.is_empty() {
                diag.error_with_hint(
                    Self::FIELDS.extensions,
                    format!("invalid extension `{ext}`"),
                    "write extensions without the leading dot, e.g. \"tsx\"",
                );
            }
        }

        self.validate_roots(diag);
    }

    fn validate_marker(marker: char, field: FieldPath, diag: &mut ConfigDiagnostics) {
        if marker.is_alphanumeric() || marker.is_whitespace() || RESERVED_MARKERS.contains(&marker)
        {
            diag.error_with_hint(
                field,
                format!("`{marker}` cannot be used as a marker"),
                "pick a symbol such as `$`, `+` or `@`",
            );
        }
    }

    fn validate_roots(&self, diag: &mut ConfigDiagnostics) {
        if self.roots.is_empty() {
            diag.error_with_hint(
                Self::FIELDS.roots,
                "no route roots configured",
                "add a [[routes.roots]] entry with `dir = \"routes\"`",
            );
            return;
        }

        let mut seen = BTreeSet::new();
        for entry in &self.roots {
            let dir = entry.dir.display();
            if entry.dir.as_os_str().is_empty() {
                diag.error(Self::FIELDS.roots, "root `dir` must not be empty");
            } else if entry.dir.is_absolute() {
                diag.error_with_hint(
                    Self::FIELDS.roots,
                    format!("root `{dir}` must be relative"),
                    format!("paths are resolved against {}", Self::FIELDS.app_dir),
                );
            }

            let prefix = entry.prefix.trim_matches('/');
            if !seen.insert((entry.dir.clone(), prefix.to_string())) {
                diag.error(
                    Self::FIELDS.roots,
                    format!("root `{dir}` is mounted at `/{prefix}` more than once"),
                );
            }

            if let Some(bad) = prefix.split('/').find(|part| !self.is_plain_prefix(part))
                && !prefix.is_empty()
            {
                diag.error_with_hint(
                    Self::FIELDS.roots,
                    format!("mount prefix `{prefix}` of root `{dir}` has invalid part `{bad}`"),
                    "prefixes may only contain letters, digits, `-` and inner `_`",
                );
            }
        }
    }

    fn is_plain_prefix(&self, part: &str) -> bool {
        !part.is_empty()
            && !part.starts_with('_')
            && !part.ends_with('_')
            && part
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    }
}

//! Naming rules of each convention.
//!
//! Both conventions share one segment state machine and one assembler; a
//! [`RuleSet`] carries everything that differs between them.

use crate::config::{Convention, RoutesConfig};

const HYBRID_ROUTE_MARKERS: &[&str] = &["_route", "route"];
const HYBRID_ROUTE_MARKERS_WITH_PAGE: &[&str] = &["_route", "route", "page"];

/// Markers a hybrid file name must escape to be read literally.
pub const HYBRID_RESERVED_NAMES: &[&str] = &[
    "index", "_index", "_layout", "layout", "_route", "route", "page",
];

/// Convention-specific naming rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    pub convention: Convention,
    /// Segments starting with this contribute no URL path.
    pub pathless_prefix: &'static str,
    /// Trailing character that un-nests a segment from its parent's path.
    pub no_nest_suffix: Option<char>,
    pub index_markers: &'static [&'static str],
    pub layout_markers: &'static [&'static str],
    pub route_markers: &'static [&'static str],
    /// Whether `name+/` folders read like `name.`.
    pub flat_folders: bool,
}

impl RuleSet {
    pub const LEGACY: Self = Self {
        convention: Convention::Legacy,
        pathless_prefix: "__",
        no_nest_suffix: None,
        index_markers: &["index"],
        layout_markers: &[],
        route_markers: &[],
        flat_folders: false,
    };

    pub const HYBRID: Self = Self {
        convention: Convention::Hybrid,
        pathless_prefix: "_",
        no_nest_suffix: Some('_'),
        index_markers: &["index", "_index"],
        layout_markers: &["_layout", "layout"],
        route_markers: HYBRID_ROUTE_MARKERS,
        flat_folders: true,
    };

    pub fn for_config(config: &RoutesConfig) -> Self {
        match config.convention {
            Convention::Legacy => Self::LEGACY,
            Convention::Hybrid if config.page_marker => Self {
                route_markers: HYBRID_ROUTE_MARKERS_WITH_PAGE,
                ..Self::HYBRID
            },
            Convention::Hybrid => Self::HYBRID,
        }
    }

    pub fn is_index(&self, raw: &str) -> bool {
        self.index_markers.contains(&raw)
    }

    pub fn is_layout(&self, raw: &str) -> bool {
        self.layout_markers.contains(&raw)
    }

    pub fn is_route_marker(&self, raw: &str) -> bool {
        self.route_markers.contains(&raw)
    }

    /// A segment is pathless when both its text and its spelling carry the
    /// prefix, so `[_]x` stays literal.
    pub fn is_pathless(&self, semantic: &str, raw: &str) -> bool {
        semantic.starts_with(self.pathless_prefix) && raw.starts_with(self.pathless_prefix)
    }

    /// Strip the no-nest suffix when it is spelled unescaped.
    pub fn strip_no_nest<'a>(&self, semantic: &'a str, raw: &str) -> &'a str {
        match self.no_nest_suffix {
            Some(suffix) if semantic.ends_with(suffix) && raw.ends_with(suffix) => {
                &semantic[..semantic.len() - suffix.len_utf8()]
            }
            _ => semantic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_rules() {
        let rules = RuleSet::LEGACY;
        assert!(rules.is_pathless("__auth", "__auth"));
        assert!(!rules.is_pathless("_auth", "_auth"));
        assert!(rules.is_index("index"));
        assert!(!rules.is_index("_index"));
        assert!(!rules.is_layout("_layout"));
        assert_eq!(rules.strip_no_nest("users_", "users_"), "users_");
    }

    #[test]
    fn test_hybrid_rules() {
        let rules = RuleSet::HYBRID;
        assert!(rules.is_pathless("_auth", "_auth"));
        assert!(!rules.is_pathless("_auth", "[_]auth"));
        assert!(rules.is_index("_index"));
        assert!(rules.is_layout("layout"));
        assert!(rules.is_route_marker("_route"));
        assert!(!rules.is_route_marker("page"));
        assert_eq!(rules.strip_no_nest("users_", "users_"), "users");
        assert_eq!(rules.strip_no_nest("users_", "users[_]"), "users_");
    }

    #[test]
    fn test_page_marker_opt_in() {
        let config = RoutesConfig {
            page_marker: true,
            ..Default::default()
        };
        assert!(RuleSet::for_config(&config).is_route_marker("page"));

        let legacy = RoutesConfig {
            convention: Convention::Legacy,
            page_marker: true,
            ..Default::default()
        };
        assert!(!RuleSet::for_config(&legacy).is_route_marker("page"));
    }
}

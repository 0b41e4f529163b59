//! Config field path used to point diagnostics at a `routetree.toml` key.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a config field, e.g. `routes.param_marker`.
///
/// Each section exposes its paths through a `FIELDS` constant:
///
/// ```ignore
/// diag.error(RoutesConfig::FIELDS.base_path, "must start with `/`");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path_as_str() {
        const FIELD: FieldPath = FieldPath::new("routes.base_path");
        assert_eq!(FIELD.as_str(), "routes.base_path");
        assert_eq!(FIELD.as_ref(), "routes.base_path");
    }
}

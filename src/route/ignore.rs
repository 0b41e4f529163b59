//! Ignore globs for route roots.
//!
//! Patterns use gitignore syntax and are matched against paths relative to
//! the route root. Dotfiles are matched like any other file.

use super::error::RouteError;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

pub struct IgnoreMatcher {
    globs: Option<Gitignore>,
}

impl IgnoreMatcher {
    pub fn new(root: &Path, patterns: &[String]) -> Result<Self, RouteError> {
        if patterns.is_empty() {
            return Ok(Self { globs: None });
        }

        let mut builder = GitignoreBuilder::new(root);
        for pattern in patterns {
            builder
                .add_line(None, pattern)
                .map_err(|source| RouteError::IgnorePattern {
                    pattern: pattern.clone(),
                    source,
                })?;
        }
        let globs = builder.build().map_err(|source| RouteError::IgnorePattern {
            pattern: patterns.join(", "),
            source,
        })?;
        Ok(Self { globs: Some(globs) })
    }

    /// Whether a file (relative to the root) is ignored.
    pub fn is_ignored(&self, relative: &str) -> bool {
        self.globs.as_ref().is_some_and(|globs| {
            globs
                .matched_path_or_any_parents(Path::new(relative), false)
                .is_ignore()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(patterns: &[&str]) -> IgnoreMatcher {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        IgnoreMatcher::new(Path::new("/app/routes"), &patterns).unwrap()
    }

    #[test]
    fn test_no_patterns() {
        assert!(!matcher(&[]).is_ignored("index.tsx"));
    }

    #[test]
    fn test_globs() {
        let m = matcher(&["**/*.css", "*.test.tsx", "drafts/"]);
        assert!(m.is_ignored("styles.css"));
        assert!(m.is_ignored("admin/styles.css"));
        assert!(m.is_ignored("admin/users.test.tsx"));
        assert!(m.is_ignored("drafts/post.tsx"));
        assert!(!m.is_ignored("admin/users.tsx"));
    }

    #[test]
    fn test_dotfiles_match() {
        let m = matcher(&["*.tsx"]);
        assert!(m.is_ignored(".hidden.tsx"));
    }

    #[test]
    fn test_invalid_pattern() {
        let patterns = vec!["*.tsx".to_string(), "[z-a].tsx".to_string()];
        let Err(err) = IgnoreMatcher::new(Path::new("/app/routes"), &patterns) else {
            panic!("inverted range accepted");
        };
        match err {
            RouteError::IgnorePattern { pattern, .. } => assert_eq!(pattern, "[z-a].tsx"),
            other => panic!("unexpected error: {other}"),
        }
    }
}

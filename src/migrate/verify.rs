//! Route table comparison.
//!
//! Both listings are normalized before they are compared: ids and file
//! names lose the cosmetic differences between conventions, closing tags
//! go away, and siblings are sorted. What remains (nesting, paths, index
//! flags) must match byte for byte.
//!
//! The listing taken before the swap is read with legacy rules, the one
//! taken after with hybrid rules. Only hybrid names have flat folders:
//! legacy `admin+/x` and hybrid `admin[+]/x` are the same route.

use super::error::MigrateError;
use crate::config::{Convention, RoutesConfig};
use crate::utils::path::split_extension;
use regex::{Captures, Regex};
use similar::{ChangeTag, TextDiff};
use std::sync::LazyLock;

static ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(id|file)="([^"]*)""#).unwrap());

/// Terminal segments that only mark a file's role.
const ROLE_MARKERS: &[&str] = &["_layout", "layout", "_route", "route", "page"];

/// Canonical form of route listings.
pub struct Normalizer {
    colocation_marker: char,
    extensions: Vec<String>,
}

impl Normalizer {
    pub fn new(routes: &RoutesConfig) -> Self {
        Self {
            colocation_marker: routes.colocation_marker,
            extensions: routes.extensions.clone(),
        }
    }

    /// Normalize a whole listing of routes named by `convention`.
    pub fn normalize(&self, listing: &str, convention: Convention) -> String {
        let lines = listing
            .lines()
            .filter(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with("</")
            })
            .map(|line| {
                let indent = line.len() - line.trim_start().len();
                (indent, self.normalize_line(line.trim(), convention))
            });

        let mut out = String::new();
        for node in nest(lines) {
            node.render(0, &mut out);
        }
        out
    }

    fn normalize_line(&self, line: &str, convention: Convention) -> String {
        let line = line
            .strip_suffix("/>")
            .or_else(|| line.strip_suffix('>'))
            .unwrap_or(line)
            .trim_end();
        ATTR.replace_all(line, |caps: &Captures| {
            format!("{}=\"{}\"", &caps[1], self.canonical(&caps[2], convention))
        })
        .into_owned()
    }

    /// Canonical spelling of a route id or module file.
    ///
    /// Hybrid `routes/admin+/_layout.tsx` and legacy `routes/admin.tsx`
    /// both become `routes.admin`.
    pub fn canonical(&self, value: &str, convention: Convention) -> String {
        let value = match split_extension(value) {
            (stem, Some(ext)) if self.extensions.iter().any(|e| e == ext) => stem,
            _ => value,
        };

        // an escaped `[+]/` never matches: `]` sits between marker and slash
        let flat = match convention {
            Convention::Hybrid => value
                .replace(&format!("{}/", self.colocation_marker), ".")
                .replace(&format!("{}\\", self.colocation_marker), "."),
            Convention::Legacy => value.to_string(),
        };
        let flat = flat.replace(['/', '\\'], ".").replace(['[', ']'], "");

        let mut parts: Vec<&str> = flat
            .split('.')
            .filter(|p| !p.is_empty())
            .map(|part| match part {
                "_index" => "index",
                part if part.starts_with("__") => &part[1..],
                part => part,
            })
            .collect();
        if parts.len() > 1 && parts.last().is_some_and(|p| ROLE_MARKERS.contains(p)) {
            parts.pop();
        }
        parts.join(".")
    }
}

/// One listing line and the lines nested below it.
#[derive(Debug)]
struct Line {
    text: String,
    children: Vec<Line>,
}

impl Line {
    fn render(&self, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&self.text);
        out.push('\n');

        let mut children: Vec<String> = self
            .children
            .iter()
            .map(|child| {
                let mut rendered = String::new();
                child.render(depth + 1, &mut rendered);
                rendered
            })
            .collect();
        children.sort();
        for child in children {
            out.push_str(&child);
        }
    }
}

/// Rebuild the nesting of `(indent, text)` lines.
fn nest(lines: impl Iterator<Item = (usize, String)>) -> Vec<Line> {
    let mut roots = Vec::new();
    let mut stack: Vec<(usize, Line)> = Vec::new();

    for (indent, text) in lines {
        while stack.last().is_some_and(|(top, _)| *top >= indent) {
            close(&mut stack, &mut roots);
        }
        stack.push((
            indent,
            Line {
                text,
                children: Vec::new(),
            },
        ));
    }
    while !stack.is_empty() {
        close(&mut stack, &mut roots);
    }
    roots
}

fn close(stack: &mut Vec<(usize, Line)>, roots: &mut Vec<Line>) {
    if let Some((_, line)) = stack.pop() {
        match stack.last_mut() {
            Some((_, parent)) => parent.children.push(line),
            None => roots.push(line),
        }
    }
}

/// Compare the legacy listing `before` with the hybrid listing `after`.
pub fn verify(before: &str, after: &str, normalizer: &Normalizer) -> Result<(), MigrateError> {
    let before = normalizer.normalize(before, Convention::Legacy);
    let after = normalizer.normalize(after, Convention::Hybrid);
    if before == after {
        return Ok(());
    }
    Err(MigrateError::VerificationFailed {
        diff: line_diff(&before, &after),
    })
}

/// Changed lines of `after` against `before`, `-`/`+` prefixed.
pub fn line_diff(before: &str, after: &str) -> String {
    let diff = TextDiff::from_lines(before, after);
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => continue,
        };
        out.push(sign);
        out.push_str(change.value());
        if !change.value().ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

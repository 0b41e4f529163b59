//! Route records: one retained file's parsed identity.

use super::convention::RuleSet;
use super::error::SegmentError;
use super::path::build_path;
use super::segment::{SegmentParser, folder_ancestors};
use std::path::PathBuf;

/// What a record is, ranked by how strongly it claims children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// A terminal layout marker (`admin/_layout.tsx`).
    Layout,
    /// A plain route file (`admin.tsx`).
    Route,
    /// A terminal route marker (`admin/_route.tsx`).
    RouteDirectory,
    /// File-less folder parent created during assembly.
    Synthetic,
}

impl RouteKind {
    /// Parent candidate score; higher wins.
    pub const fn score(self) -> u8 {
        match self {
            Self::Layout => 3,
            Self::Route => 2,
            Self::RouteDirectory => 1,
            Self::Synthetic => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    /// Mount prefix + path relative to the root, extension stripped.
    pub id: String,
    /// Module file relative to the app directory.
    pub file: Option<PathBuf>,
    pub segments: Vec<String>,
    pub raw_segments: Vec<String>,
    /// Semantic segments joined with `/`; the parent matching key.
    pub name: String,
    pub full_path: Option<String>,
    pub is_index: bool,
    pub kind: RouteKind,
    /// Folders that may receive a synthesized parent, as
    /// `(segment count, folder id)`.
    pub folders: Vec<(usize, String)>,
    /// Resolved parent id; `None` is the implicit root.
    pub parent_id: Option<String>,
}

impl RouteRecord {
    /// Parse a route file's id.
    pub fn parse(
        parser: &SegmentParser,
        id: &str,
        file: PathBuf,
        base_path: &str,
    ) -> Result<Self, SegmentError> {
        let parsed = parser.parse(id)?;
        let rules = parser.rules();

        let folders: Vec<(usize, String)> = folder_ancestors(&parsed)
            .into_iter()
            .map(|(count, offset)| (count, id[..offset].to_string()))
            .collect();

        let (mut segments, mut raw_segments): (Vec<String>, Vec<String>) =
            parsed.into_iter().map(|s| (s.semantic, s.raw)).unzip();

        let last = raw_segments.last().map(String::as_str);
        let is_index = last.is_some_and(|raw| rules.is_index(raw));
        let kind = match last {
            Some(raw) if rules.is_layout(raw) => RouteKind::Layout,
            Some(raw) if rules.is_route_marker(raw) => RouteKind::RouteDirectory,
            _ => RouteKind::Route,
        };
        if kind != RouteKind::Route {
            segments.pop();
            raw_segments.pop();
        }

        let folders = folders
            .into_iter()
            .filter(|(count, _)| *count < segments.len())
            .collect();

        Ok(Self::assemble(
            rules,
            id.to_string(),
            Some(file),
            segments,
            raw_segments,
            is_index,
            kind,
            folders,
            base_path,
        ))
    }

    /// A file-less parent for the first `count` segments of `child`.
    pub fn synthetic(
        rules: &RuleSet,
        child: &Self,
        count: usize,
        id: String,
        base_path: &str,
    ) -> Self {
        Self::assemble(
            rules,
            id,
            None,
            child.segments[..count].to_vec(),
            child.raw_segments[..count].to_vec(),
            false,
            RouteKind::Synthetic,
            Vec::new(),
            base_path,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        rules: &RuleSet,
        id: String,
        file: Option<PathBuf>,
        segments: Vec<String>,
        raw_segments: Vec<String>,
        is_index: bool,
        kind: RouteKind,
        folders: Vec<(usize, String)>,
        base_path: &str,
    ) -> Self {
        let full_path = build_path(rules, &segments, &raw_segments, is_index, base_path);
        Self {
            name: segments.join("/"),
            id,
            file,
            segments,
            raw_segments,
            full_path,
            is_index,
            kind,
            folders,
            parent_id: None,
        }
    }

    /// Whether the record may parent other routes.
    pub fn is_candidate(&self) -> bool {
        !self.is_index
    }
}

//! Route collection: files under each root become route records.
//!
//! For every file, in order:
//! 1. ignore globs drop it
//! 2. colocated files are checked, then drop it
//! 3. non-module extensions drop it
//! 4. `route_file_pattern` (when set) must match nested files
//! 5. the id is parsed into a record; ids must be unique

use super::convention::RuleSet;
use super::error::RouteError;
use super::ignore::IgnoreMatcher;
use super::record::RouteRecord;
use super::segment::SegmentParser;
use super::walk::Walker;
use crate::config::RoutesConfig;
use crate::debug;
use crate::utils::path::split_extension;
use regex::Regex;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// Collects route records for one configuration.
pub struct RouteCollector<'a> {
    config: &'a RoutesConfig,
    parser: SegmentParser,
    route_pattern: Option<Regex>,
    walker: &'a dyn Walker,
}

impl<'a> RouteCollector<'a> {
    pub fn new(config: &'a RoutesConfig, walker: &'a dyn Walker) -> Result<Self, RouteError> {
        let parser = SegmentParser::new(
            RuleSet::for_config(config),
            config.param_marker,
            config.colocation_marker,
        );
        let route_pattern = config
            .route_file_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(RouteError::RoutePattern)?;

        Ok(Self {
            config,
            parser,
            route_pattern,
            walker,
        })
    }

    pub fn rules(&self) -> &RuleSet {
        self.parser.rules()
    }

    /// Collect the records of every root.
    pub fn collect(&self) -> Result<Vec<RouteRecord>, RouteError> {
        let mut records = Vec::new();
        let mut seen: FxHashMap<String, PathBuf> = FxHashMap::default();

        for root in &self.config.roots {
            let dir = self.config.root_dir(root);
            let ignore = IgnoreMatcher::new(&dir, &self.config.ignore)?;

            let mut files = Vec::new();
            self.walker
                .visit(&dir, &mut |relative| files.push(relative.to_string()))?;
            files.sort();

            for relative in &files {
                let file = root.dir.join(relative);
                let Some(stem) = self.route_stem(relative, &file, &ignore)? else {
                    continue;
                };

                let id = if root.prefix.is_empty() {
                    stem.to_string()
                } else {
                    format!("{}/{stem}", root.prefix)
                };

                if let Some(first) = seen.get(&id) {
                    return Err(RouteError::DuplicateId {
                        id,
                        first: first.clone(),
                        second: file,
                    });
                }

                let record =
                    RouteRecord::parse(&self.parser, &id, file.clone(), &self.config.base_path)
                        .map_err(|reason| RouteError::InvalidSegment {
                            file: file.clone(),
                            reason,
                        })?;
                seen.insert(id, file);
                records.push(record);
            }
        }

        debug!("collect"; "{} route files", records.len());
        Ok(records)
    }

    /// The path of a route module with its extension stripped, or `None`
    /// for files that are not routes.
    fn route_stem<'p>(
        &self,
        relative: &'p str,
        file: &Path,
        ignore: &IgnoreMatcher,
    ) -> Result<Option<&'p str>, RouteError> {
        if ignore.is_ignored(relative) {
            debug!("collect"; "ignored {}", relative);
            return Ok(None);
        }

        if self.is_colocated(relative, file)? {
            debug!("collect"; "colocated {}", relative);
            return Ok(None);
        }

        let (stem, ext) = split_extension(relative);
        if !ext.is_some_and(|ext| self.config.is_route_extension(ext)) {
            return Ok(None);
        }

        if let Some(pattern) = &self.route_pattern
            && relative.contains('/')
            && !pattern.is_match(relative)
        {
            debug!("collect"; "{} does not match route_file_pattern", relative);
            return Ok(None);
        }

        Ok(Some(stem))
    }

    /// Whether a file is colocated: it lives in a colocation folder or its
    /// own name carries the marker.
    ///
    /// Fails for colocated content at the top of the root and for nested
    /// colocation folders.
    fn is_colocated(&self, relative: &str, file: &Path) -> Result<bool, RouteError> {
        let marker = self.config.colocation_marker;
        let mut folders: Vec<&str> = relative.split('/').collect();

        if folders.first().is_some_and(|f| f.starts_with(marker)) {
            return Err(RouteError::ColocationAtRoot {
                file: file.to_path_buf(),
            });
        }

        let name = folders.pop().unwrap_or_default();
        match folders.iter().filter(|f| f.starts_with(marker)).count() {
            0 => Ok(name.starts_with(marker)),
            1 => Ok(true),
            _ => Err(RouteError::NestedColocation {
                file: file.to_path_buf(),
            }),
        }
    }
}

/// Test walker serving a fixed file list.
#[cfg(test)]
pub struct ListWalker(pub Vec<&'static str>);

#[cfg(test)]
impl Walker for ListWalker {
    fn visit(
        &self,
        _root: &Path,
        visit: &mut dyn FnMut(&str),
    ) -> Result<(), RouteError> {
        for file in &self.0 {
            visit(file);
        }
        Ok(())
    }
}

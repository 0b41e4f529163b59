//! Parent resolution.
//!
//! Candidates are grouped by name. A record first looks for a stronger
//! sibling under its own name (non-index records only), then walks its
//! name's prefixes from longest to shortest. At each level the best
//! non-self, non-index candidate wins: highest score, then smallest id.

use crate::debug;
use crate::route::{RouteRecord, RuleSet};
use rustc_hash::{FxHashMap, FxHashSet};

/// Synthesize folder parents, then resolve every record's parent.
pub fn resolve(
    mut records: Vec<RouteRecord>,
    rules: &RuleSet,
    base_path: &str,
) -> Vec<RouteRecord> {
    records.sort_by(|a, b| a.id.cmp(&b.id));

    let synthetic = synthesize(&records, rules, base_path);
    records.extend(synthetic);

    let parents: Vec<Option<String>> = {
        let candidates = Candidates::new(&records);
        records
            .iter()
            .map(|record| {
                candidates
                    .parent_of(record)
                    .map(|at| records[at].id.clone())
            })
            .collect()
    };

    for (record, parent) in records.iter_mut().zip(parents) {
        debug!("resolve"; "{} -> {}", record.id, parent.as_deref().unwrap_or("<root>"));
        record.parent_id = parent;
    }
    records
}

/// File-less parents for plain folders that have no route of their own.
fn synthesize(records: &[RouteRecord], rules: &RuleSet, base_path: &str) -> Vec<RouteRecord> {
    let real: FxHashSet<&str> = records
        .iter()
        .filter(|r| r.is_candidate())
        .map(|r| r.name.as_str())
        .collect();
    let mut taken: FxHashSet<String> = records.iter().map(|r| r.id.clone()).collect();
    let mut names: FxHashSet<String> = FxHashSet::default();
    let mut synthetic = Vec::new();

    for record in records {
        for (count, folder_id) in &record.folders {
            let name = record.segments[..*count].join("/");
            if real.contains(name.as_str()) || names.contains(&name) || taken.contains(folder_id) {
                continue;
            }
            debug!("resolve"; "synthesized {} for {}", folder_id, record.id);
            taken.insert(folder_id.clone());
            names.insert(name);
            synthetic.push(RouteRecord::synthetic(
                rules,
                record,
                *count,
                folder_id.clone(),
                base_path,
            ));
        }
    }
    synthetic
}

struct Candidates<'a> {
    records: &'a [RouteRecord],
    by_name: FxHashMap<&'a str, Vec<usize>>,
}

impl<'a> Candidates<'a> {
    fn new(records: &'a [RouteRecord]) -> Self {
        let mut by_name: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
        for (at, record) in records.iter().enumerate() {
            if record.is_candidate() {
                by_name.entry(record.name.as_str()).or_default().push(at);
            }
        }
        Self { records, by_name }
    }

    fn parent_of(&self, record: &RouteRecord) -> Option<usize> {
        let count = record.segments.len();

        if !record.is_index && count > 0 {
            let score = record.kind.score();
            let sibling = self.best(&record.name, |c| {
                c.id != record.id && c.kind.score() > score
            });
            if sibling.is_some() {
                return sibling;
            }
        }

        (1..count).rev().find_map(|len| {
            let name = record.segments[..len].join("/");
            self.best(&name, |c| c.id != record.id)
        })
    }

    fn best(&self, name: &str, accept: impl Fn(&RouteRecord) -> bool) -> Option<usize> {
        self.by_name
            .get(name)?
            .iter()
            .copied()
            .filter(|&at| accept(&self.records[at]))
            .min_by(|&a, &b| {
                let (a, b) = (&self.records[a], &self.records[b]);
                b.kind
                    .score()
                    .cmp(&a.kind.score())
                    .then_with(|| a.id.cmp(&b.id))
            })
    }
}

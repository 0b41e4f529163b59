//! Legacy to hybrid route migration.
//!
//! # Protocol
//!
//! ```text
//! detect entry ─► clean tree gate ─► snapshot before ─► plan ─► stage
//!                                                                 │ (dry run stops here)
//!                                                                 ▼
//!     commit ◄─ verify ◄─ snapshot after ◄─ rewrite entry ◄─ swap
//!                  │
//!                  └─► rollback (any failure after the swap)
//! ```
//!
//! The run succeeds only when the route table listed after the swap equals
//! the one listed before it, modulo spelling.
//!
//! # Module Structure
//!
//! | Module     | Purpose                                      |
//! |------------|----------------------------------------------|
//! | `entry`    | `routetree.toml` detection and rewrite       |
//! | `git`      | Clean working tree gate                      |
//! | `snapshot` | Route table listers                          |
//! | `plan`     | Legacy file -> hybrid file mapping           |
//! | `stage`    | Writing the staged tree                      |
//! | `swap`     | Two-rename swap, commit and rollback         |
//! | `verify`   | Listing normalization and diff               |

mod entry;
mod error;
mod git;
mod plan;
mod snapshot;
mod stage;
mod swap;
mod verify;

pub use entry::EntryPoint;
pub use error::MigrateError;
pub use git::{GitWorkingTree, WorkingTree};
pub use plan::{MappingEntry, MappingPlan};
pub use snapshot::{BuiltinLister, CommandLister, RouteLister, lister_for};
pub use stage::stage;
pub use swap::{Rollback, commit, rollback, swap};
pub use verify::{Normalizer, line_diff, verify};

use crate::config::{Convention, ProjectConfig, RoutesConfig, backup_dir_for};
use crate::route::FsWalker;
use crate::utils::plural_count;
use crate::{debug, log};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    DetectEntry,
    CheckWorkingTree,
    SnapshotBefore,
    BuildPlan,
    Stage,
    Swap,
    RewriteEntry,
    SnapshotAfter,
    Verify,
    Commit,
}

impl Step {
    const fn as_str(self) -> &'static str {
        match self {
            Self::DetectEntry => "detect entry",
            Self::CheckWorkingTree => "check working tree",
            Self::SnapshotBefore => "snapshot before",
            Self::BuildPlan => "build plan",
            Self::Stage => "stage",
            Self::Swap => "swap",
            Self::RewriteEntry => "rewrite entry",
            Self::SnapshotAfter => "snapshot after",
            Self::Verify => "verify",
            Self::Commit => "commit",
        }
    }
}

/// How a migration run ended.
#[derive(Debug)]
pub enum Outcome {
    /// The tree was staged at the target; nothing was swapped.
    DryRun(MappingPlan),
    /// The migrated tree replaced the source and verified.
    Committed(MappingPlan),
}

/// One migration of a legacy route directory.
pub struct Migration<'a> {
    project: &'a ProjectConfig,
    source: PathBuf,
    target: PathBuf,
    tree: &'a dyn WorkingTree,
    lister: &'a dyn RouteLister,
}

impl<'a> Migration<'a> {
    /// Migration of the `[migrate]` directories of `project`.
    pub fn new(
        project: &'a ProjectConfig,
        tree: &'a dyn WorkingTree,
        lister: &'a dyn RouteLister,
    ) -> Self {
        Self {
            project,
            source: project.migrate.source.clone(),
            target: project.migrate.target_dir(),
            tree,
            lister,
        }
    }

    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.source = source;
        self
    }

    pub fn with_target(mut self, target: PathBuf) -> Self {
        self.target = target;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Routes configuration reading the source directory.
    fn routes(&self, convention: Convention) -> RoutesConfig {
        self.project
            .routes
            .for_root(&self.source)
            .with_convention(convention)
    }

    /// Run the protocol. Any failure after the swap is rolled back before
    /// the error is returned.
    pub fn run(&self, dry_run: bool) -> Result<Outcome, MigrateError> {
        let legacy = self.routes(Convention::Legacy);
        let hybrid = self.routes(Convention::Hybrid);

        step(Step::DetectEntry);
        let entry = EntryPoint::detect(self.project)?;
        if !self.source.is_dir() {
            return Err(MigrateError::MissingSource(self.source.clone()));
        }
        if self.target.exists() {
            return Err(MigrateError::TargetExists(self.target.clone()));
        }
        let backup = backup_dir_for(&self.source);
        if backup.exists() {
            return Err(MigrateError::BackupExists(backup));
        }

        step(Step::CheckWorkingTree);
        let mut scope = vec![self.source.as_path()];
        if entry.exists() {
            scope.push(entry.path());
        }
        let changes = self.tree.changes(&scope)?;
        if !changes.is_empty() {
            return Err(MigrateError::DirtyWorkingTree(changes));
        }

        step(Step::SnapshotBefore);
        let before = self.lister.list(&legacy)?;

        step(Step::BuildPlan);
        let plan = MappingPlan::build(&legacy, &FsWalker::new(legacy.follow_links))?;
        log!("migrate"; "{}, {} moved", plural_count(plan.entries.len(), "file"), plan.moved());

        step(Step::Stage);
        stage(&plan, &self.source, &self.target)?;
        if dry_run {
            let staged = self.project.root_relative(&self.target);
            log!("migrate"; "dry run: staged at {}", staged.display());
            return Ok(Outcome::DryRun(plan));
        }

        step(Step::Swap);
        swap(&self.source, &self.target)?;

        if let Err(err) = self.finish(&entry, &before, &hybrid) {
            log!("rollback"; "{err}");
            match self.undo(&entry) {
                Ok(_) => log!(
                    "rollback"; "restored {}, migrated tree kept at {}",
                    self.project.root_relative(&self.source).display(),
                    self.project.root_relative(&self.target).display()
                ),
                Err(undo) => log!("error"; "rollback failed: {undo}"),
            }
            return Err(err);
        }

        step(Step::Commit);
        commit(&self.source)?;
        entry.commit()?;
        log!("commit"; "{} migrated", self.project.root_relative(&self.source).display());
        Ok(Outcome::Committed(plan))
    }

    /// Everything between the swap and the commit.
    fn finish(
        &self,
        entry: &EntryPoint,
        before: &str,
        hybrid: &RoutesConfig,
    ) -> Result<(), MigrateError> {
        step(Step::RewriteEntry);
        if entry.rewrite()? {
            log!("migrate"; "rewrote {}", self.project.root_relative(entry.path()).display());
        }

        step(Step::SnapshotAfter);
        let after = self.lister.list(hybrid)?;

        step(Step::Verify);
        verify(before, &after, &Normalizer::new(hybrid))?;
        log!("verify"; "route table unchanged");
        Ok(())
    }

    fn undo(&self, entry: &EntryPoint) -> Result<Rollback, MigrateError> {
        entry.restore()?;
        rollback(&self.source, &self.target)
    }
}

/// Undo an interrupted migration of `source`.
///
/// Idempotent: with no backup and no entry copy there is nothing to do.
pub fn restore(
    project: &ProjectConfig,
    source: &Path,
    target: &Path,
) -> Result<Rollback, MigrateError> {
    let entry = EntryPoint::at(&project.config_path);
    let entry_restored = entry.restore()?;
    let outcome = rollback(source, target)?;
    if entry_restored && outcome == Rollback::NothingToRestore {
        return Ok(Rollback::Restored);
    }
    Ok(outcome)
}

fn step(step: Step) {
    debug!("migrate"; "step: {}", step.as_str());
}

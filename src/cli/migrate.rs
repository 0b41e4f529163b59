//! `migrate` and `rollback` commands.

use super::MigrateDirs;
use crate::config::{DEFAULT_TARGET_NAME, ProjectConfig};
use crate::logger::{status_success, status_warning};
use crate::migrate::{
    GitWorkingTree, MappingPlan, Migration, Outcome, Rollback, lister_for, restore,
};
use crate::utils::path::{normalize_path, sibling};
use crate::utils::plural_count;
use crate::log;
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

/// Migrate the source directory and print the moves to stdout.
pub fn run_migrate(config: &ProjectConfig, dirs: &MigrateDirs, dry_run: bool) -> Result<()> {
    let (source, target) = resolve_dirs(config, dirs);
    let tree = GitWorkingTree::discover(&config.root)?;
    let lister = lister_for(config);

    let outcome = Migration::new(config, &tree, lister.as_ref())
        .with_source(source)
        .with_target(target)
        .run(dry_run)?;

    match outcome {
        Outcome::DryRun(plan) => {
            print_moves(&plan)?;
            status_warning("dry run: nothing was swapped");
        }
        Outcome::Committed(plan) => {
            print_specifiers(&plan)?;
            status_success(&format!(
                "migrated {}, route table verified",
                plural_count(plan.moved(), "file")
            ));
        }
    }
    Ok(())
}

/// Undo an interrupted migration.
pub fn run_rollback(config: &ProjectConfig, dirs: &MigrateDirs) -> Result<()> {
    let (source, target) = resolve_dirs(config, dirs);
    match restore(config, &source, &target)? {
        Rollback::Restored => status_success(&format!(
            "restored {}",
            config.root_relative(&source).display()
        )),
        Rollback::NothingToRestore => log!("rollback"; "nothing to restore"),
    }
    Ok(())
}

/// Command-line directories win over `[migrate]`; a source given without
/// a target stages next to that source.
fn resolve_dirs(config: &ProjectConfig, dirs: &MigrateDirs) -> (PathBuf, PathBuf) {
    let source = dirs
        .source
        .as_deref()
        .map_or_else(|| config.migrate.source.clone(), normalize_path);
    let target = match (&dirs.target, &dirs.source) {
        (Some(target), _) => normalize_path(target),
        (None, Some(_)) => sibling(&source, DEFAULT_TARGET_NAME),
        (None, None) => config.migrate.target_dir(),
    };
    (source, target)
}

fn print_moves(plan: &MappingPlan) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for entry in plan.entries.iter().filter(|e| e.source != e.target) {
        writeln!(stdout, "{} -> {}", entry.source, entry.target)?;
    }
    Ok(())
}

/// Import specifier table for rewriting module imports.
fn print_specifiers(plan: &MappingPlan) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for (old, new) in plan.specifiers.iter().filter(|(old, new)| old != new) {
        writeln!(stdout, "{old} -> {new}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config() -> ProjectConfig {
        let mut config = ProjectConfig::default();
        config.migrate.source = "/proj/app/routes".into();
        config
    }

    #[test]
    fn test_dirs_default_to_config() {
        let dirs = MigrateDirs {
            source: None,
            target: None,
        };
        let (source, target) = resolve_dirs(&config(), &dirs);
        assert_eq!(source, Path::new("/proj/app/routes"));
        assert_eq!(target, Path::new("/proj/app/new-routes"));
    }

    #[test]
    fn test_source_argument_moves_default_target() {
        let dirs = MigrateDirs {
            source: Some("/other/routes".into()),
            target: None,
        };
        let (source, target) = resolve_dirs(&config(), &dirs);
        assert_eq!(source, Path::new("/other/routes"));
        assert_eq!(target, Path::new("/other/new-routes"));
    }
}

//! Writing the migrated tree next to the source.

use super::error::MigrateError;
use super::plan::MappingPlan;
use crate::debug;
use std::fs;
use std::path::Path;

/// Copy every planned file from `source` into a fresh `target` directory.
///
/// A partially written target is removed again on failure.
pub fn stage(plan: &MappingPlan, source: &Path, target: &Path) -> Result<usize, MigrateError> {
    if target.exists() {
        return Err(MigrateError::TargetExists(target.to_path_buf()));
    }

    let result = copy_all(plan, source, target);
    if result.is_err() {
        debug!("stage"; "removing partial {}", target.display());
        let _ = fs::remove_dir_all(target);
    }
    result
}

fn copy_all(plan: &MappingPlan, source: &Path, target: &Path) -> Result<usize, MigrateError> {
    fs::create_dir_all(target).map_err(MigrateError::io(target))?;
    for entry in &plan.entries {
        let from = source.join(&entry.source);
        let to = target.join(&entry.target);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).map_err(MigrateError::io(parent))?;
        }
        fs::copy(&from, &to).map_err(MigrateError::io(&from))?;
        debug!("stage"; "{} -> {}", entry.source, entry.target);
    }
    Ok(plan.entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::plan::MappingEntry;
    use tempfile::TempDir;

    fn entry(source: &str, target: &str) -> MappingEntry {
        MappingEntry {
            source: source.into(),
            target: target.into(),
        }
    }

    #[test]
    fn test_stage_copies_to_targets() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("routes");
        fs::create_dir_all(source.join("admin")).unwrap();
        fs::write(source.join("admin.tsx"), "layout").unwrap();
        fs::write(source.join("admin/users.tsx"), "users").unwrap();

        let plan = MappingPlan {
            entries: vec![
                entry("admin.tsx", "admin+/_layout.tsx"),
                entry("admin/users.tsx", "admin+/users.tsx"),
            ],
            specifiers: Vec::new(),
        };
        let target = dir.path().join("new-routes");
        assert_eq!(stage(&plan, &source, &target).unwrap(), 2);
        assert_eq!(
            fs::read_to_string(target.join("admin+/_layout.tsx")).unwrap(),
            "layout"
        );
        assert!(target.join("admin+/users.tsx").is_file());
        // the source is untouched
        assert!(source.join("admin.tsx").is_file());
    }

    #[test]
    fn test_existing_target_refused() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("new-routes");
        fs::create_dir_all(&target).unwrap();
        let err = stage(&MappingPlan::default(), dir.path(), &target).unwrap_err();
        assert!(matches!(err, MigrateError::TargetExists(_)));
    }

    #[test]
    fn test_failed_stage_leaves_no_target() {
        let dir = TempDir::new().unwrap();
        let plan = MappingPlan {
            entries: vec![entry("missing.tsx", "missing.tsx")],
            specifiers: Vec::new(),
        };
        let target = dir.path().join("new-routes");
        assert!(stage(&plan, dir.path(), &target).is_err());
        assert!(!target.exists());
    }
}

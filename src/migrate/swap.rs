//! Directory swap and its rollback.
//!
//! The swap is two renames: `source -> backup`, then `target -> source`.
//! Each rename is atomic, the pair is not. [`rollback`] restores the
//! source from whatever state a crash left behind.

use super::error::MigrateError;
use crate::config::backup_dir_for;
use crate::debug;
use std::fs;
use std::path::Path;

/// What [`rollback`] found to undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollback {
    /// No backup: nothing was swapped, or a previous rollback finished.
    NothingToRestore,
    Restored,
}

/// Move the staged `target` into the place of `source`, keeping the
/// original as `<source>.routetree-backup`.
pub fn swap(source: &Path, target: &Path) -> Result<(), MigrateError> {
    let backup = backup_dir_for(source);
    if backup.exists() {
        return Err(MigrateError::BackupExists(backup));
    }

    fs::rename(source, &backup).map_err(MigrateError::io(source))?;
    debug!("swap"; "{} -> {}", source.display(), backup.display());

    if let Err(err) = fs::rename(target, source) {
        // put the original back before reporting
        fs::rename(&backup, source).map_err(MigrateError::io(&backup))?;
        return Err(MigrateError::io(target)(err));
    }
    debug!("swap"; "{} -> {}", target.display(), source.display());
    Ok(())
}

/// Drop the backup of a verified swap.
pub fn commit(source: &Path) -> Result<(), MigrateError> {
    let backup = backup_dir_for(source);
    if backup.exists() {
        fs::remove_dir_all(&backup).map_err(MigrateError::io(&backup))?;
    }
    Ok(())
}

/// Restore `source` from its backup.
///
/// The migrated tree currently at `source` goes back to `target` for
/// inspection; if `target` is taken it is discarded. Running it again
/// afterwards is a no-op.
pub fn rollback(source: &Path, target: &Path) -> Result<Rollback, MigrateError> {
    let backup = backup_dir_for(source);
    if !backup.exists() {
        return Ok(Rollback::NothingToRestore);
    }

    if source.exists() {
        if target.exists() {
            fs::remove_dir_all(source).map_err(MigrateError::io(source))?;
        } else {
            fs::rename(source, target).map_err(MigrateError::io(source))?;
        }
    }
    fs::rename(&backup, source).map_err(MigrateError::io(&backup))?;
    debug!("rollback"; "{} restored", source.display());
    Ok(Rollback::Restored)
}

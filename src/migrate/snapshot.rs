//! Route table snapshots taken before and after the swap.

use super::error::MigrateError;
use crate::config::{ProjectConfig, RoutesConfig};
use crate::tree::{route_tree, to_listing};
use crate::utils::exec::Cmd;
use std::path::PathBuf;

/// Produces the externally observable route table.
pub trait RouteLister {
    fn list(&self, routes: &RoutesConfig) -> Result<String, MigrateError>;
}

/// Lists routes with this crate's own compiler.
pub struct BuiltinLister;

impl RouteLister for BuiltinLister {
    fn list(&self, routes: &RoutesConfig) -> Result<String, MigrateError> {
        Ok(to_listing(&route_tree(routes)?))
    }
}

/// Lists routes by running the host router's command.
pub struct CommandLister {
    pub command: Vec<String>,
    pub cwd: PathBuf,
}

impl RouteLister for CommandLister {
    fn list(&self, _routes: &RoutesConfig) -> Result<String, MigrateError> {
        let output = Cmd::from_slice(&self.command)
            .cwd(&self.cwd)
            .envs([("NO_COLOR", "1"), ("FORCE_COLOR", "0")])
            .run()
            .map_err(|err| MigrateError::Snapshot(format!("{err:#}")))?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// The lister configured by `[migrate] snapshot_command`.
pub fn lister_for(project: &ProjectConfig) -> Box<dyn RouteLister> {
    if project.migrate.snapshot_command.is_empty() {
        Box::new(BuiltinLister)
    } else {
        Box::new(CommandLister {
            command: project.migrate.snapshot_command.clone(),
            cwd: project.root.clone(),
        })
    }
}

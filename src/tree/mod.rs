//! Route tree compilation.
//!
//! ```text
//! files ─► RouteCollector ─► resolve (synthesize + parents) ─► sort ─► manifest ─► tree
//! ```

mod assemble;
mod manifest;
mod render;
mod resolve;

pub use assemble::{assemble, sort_records};
pub use manifest::{ManifestBuilder, RouteDef, RouteManifest, RouteNode};
pub use render::{to_json, to_listing};
pub use resolve::resolve;

use crate::config::RoutesConfig;
use crate::route::{FsWalker, RouteCollector, RouteError, RouteRecord, Walker};

/// Collect, resolve and sort the records of a configuration.
pub fn compile_records(
    config: &RoutesConfig,
    walker: &dyn Walker,
) -> Result<Vec<RouteRecord>, RouteError> {
    let collector = RouteCollector::new(config, walker)?;
    let records = collector.collect()?;
    let mut records = resolve(records, collector.rules(), &config.base_path);
    sort_records(&mut records);
    Ok(records)
}

/// Compile the route tree read through `walker`.
pub fn route_tree_with(
    config: &RoutesConfig,
    walker: &dyn Walker,
) -> Result<Vec<RouteNode>, RouteError> {
    let records = compile_records(config, walker)?;
    assemble(&records)?.into_tree()
}

/// Compile the route tree from the filesystem.
pub fn route_tree(config: &RoutesConfig) -> Result<Vec<RouteNode>, RouteError> {
    route_tree_with(config, &FsWalker::new(config.follow_links))
}

//! Command-line interface module.

mod args;
pub mod migrate;
pub mod routes;

pub use args::{Cli, Commands, Format, MigrateDirs};

//! Utility modules shared by the route compiler and the migration tool.

pub mod exec;
pub mod path;
mod plural;

pub use plural::{plural_count, plural_s};

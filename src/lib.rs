//! routetree - compile filesystem route conventions into a route tree.
//!
//! ```text
//! route files ─► route (segments, records) ─► tree (resolve, assemble) ─► RouteNode forest
//!                                                                          │
//!            migrate (plan, stage, swap, verify) ◄── listings ─────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod logger;
pub mod migrate;
pub mod route;
pub mod tree;
pub mod utils;

pub use config::{Convention, ProjectConfig, RoutesConfig};
pub use tree::{RouteNode, route_tree};

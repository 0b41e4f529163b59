//! Configuration section definitions.
//!
//! Each module corresponds to a section in `routetree.toml`:
//!
//! | Module    | TOML Section | Purpose                                  |
//! |-----------|--------------|------------------------------------------|
//! | `routes`  | `[routes]`   | Route roots, convention, markers, ignore |
//! | `migrate` | `[migrate]`  | Migration source, target, snapshots      |

mod migrate;
mod routes;

pub use migrate::{BACKUP_SUFFIX, DEFAULT_TARGET_NAME, MigrateConfig, backup_dir_for};
pub use routes::{Convention, LEGACY_KEYS, RouteRoot, RoutesConfig};

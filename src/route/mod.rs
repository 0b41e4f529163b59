//! Route file parsing and collection.
//!
//! | Module       | Purpose                                         |
//! |--------------|-------------------------------------------------|
//! | `convention` | Per-convention naming rules                     |
//! | `segment`    | Segment state machine                           |
//! | `path`       | URL path construction                           |
//! | `record`     | Route records and parent scores                 |
//! | `collect`    | Files under each root to records                |
//! | `ignore`     | Ignore globs                                    |
//! | `walk`       | Directory traversal                             |
//! | `error`      | `RouteError`, `SegmentError`                    |

mod collect;
mod convention;
mod error;
mod ignore;
mod path;
mod record;
mod segment;
mod walk;

pub use collect::RouteCollector;
#[cfg(test)]
pub use collect::ListWalker;
pub use convention::{HYBRID_RESERVED_NAMES, RuleSet};
pub use error::{RouteError, SegmentError};
pub use path::{build_path, relative_path};
pub use record::{RouteKind, RouteRecord};
pub use segment::{Boundary, Segment, SegmentParser, folder_ancestors};
pub use walk::{FsWalker, Walker};

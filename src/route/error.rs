//! Route compilation errors.

use std::path::PathBuf;
use thiserror::Error;

/// A file name the segment state machine rejects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("segment `{segment}` cannot contain `{ch}`")]
    InvalidChar { segment: String, ch: char },

    #[error("segment `{segment}` cannot contain `/` once unescaped")]
    EmbeddedSlash { segment: String },

    #[error("optional splat in `{id}`: a splat is already optional")]
    OptionalSplat { id: String },

    #[error("unterminated `{open}` in `{id}`")]
    Unterminated { open: char, id: String },
}

/// Errors raised while turning route files into a tree.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route directory `{}` does not exist", .0.display())]
    MissingRoot(PathBuf),

    #[error("failed to read route directory `{}`", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid ignore pattern `{pattern}`")]
    IgnorePattern {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    #[error("invalid route file pattern")]
    RoutePattern(#[source] regex::Error),

    #[error("invalid route file `{}`: {reason}", file.display())]
    InvalidSegment { file: PathBuf, reason: SegmentError },

    #[error("colocated file `{}` must live inside a route folder", file.display())]
    ColocationAtRoot { file: PathBuf },

    #[error("colocation folders cannot be nested: `{}`", file.display())]
    NestedColocation { file: PathBuf },

    #[error(
        "route id `{id}` is defined by both `{}` and `{}`",
        first.display(),
        second.display()
    )]
    DuplicateId {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("index route `{parent}` cannot have child route `{child}`")]
    IndexParent { parent: String, child: String },

    #[error("route `{child}` references unknown parent `{parent}`")]
    UnknownParent { parent: String, child: String },

    #[error("route `{id}` is not reachable from the root")]
    Unreachable { id: String },
}

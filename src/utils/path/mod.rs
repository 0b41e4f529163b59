//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `resolve_path`)
//! - [`slash`]: Forward-slash relative paths (`to_slash`, `split_extension`)

pub mod fs;
pub mod slash;

pub use fs::{expand_tilde, normalize_path, resolve_path, sibling};
pub use slash::{split_extension, to_slash};

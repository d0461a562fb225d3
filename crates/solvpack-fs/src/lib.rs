//! Filesystem primitives used while bundling a solver binary.
//!
//! - [`atomic_write`] / [`atomic_write_with`] / [`atomic_copy`] stage into a sibling temp file and rename over the target
//! - [`find_files_named`] walks a tree for files with a given name, sorted by path
//! - [`set_modified`] / [`modified`] read and reset modification times
//! - [`Workspace`] owns a fresh per-run directory under a staging root and removes it on drop

mod copy;
mod error;
mod mtime;
mod walk;
mod workspace;

pub use copy::{AtomicCopyOptions, atomic_copy, atomic_write, atomic_write_with};
pub use error::{Error, Result};
pub use mtime::{modified, set_modified};
pub use walk::{MatchOptions, find_files_named};
pub use workspace::Workspace;

//! Zip extraction with path sanitization, and deterministic zip packaging.
//!
//! # Architecture
//!
//! - `detect.rs` - Format detection from magic bytes
//! - `sanitize.rs` - Path sanitization (zip-slip prevention)
//! - `extract.rs` - Extraction into a destination directory
//! - `pack.rs` - Directory to zip packaging
//! - `report.rs` - Extraction report types

pub use detect::{ArchiveFormat, detect_format, detect_from_reader};
pub use error::{Error, Result};
pub use extract::{ExtractOptions, extract_zip, extract_zip_file};
pub use pack::{PackReport, pack_dir};
pub use report::{ExtractReport, ExtractedEntry};
pub use sanitize::sanitize_entry_path;

mod detect;
mod error;
mod extract;
mod pack;
mod report;
mod sanitize;

use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, Default)]
pub struct MatchOptions {
    pub case_insensitive: bool,
}

impl MatchOptions {
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// Whether the last component of `path` is `name`.
    pub fn file_name_is(&self, path: &Path, name: &str) -> bool {
        path.file_name().is_some_and(|f| self.matches(f, name))
    }

    fn matches(&self, candidate: &OsStr, name: &str) -> bool {
        match candidate.to_str() {
            Some(c) if self.case_insensitive => c.eq_ignore_ascii_case(name),
            Some(c) => c == name,
            None => false,
        }
    }
}

/// Recursively collect regular files under `root` whose file name is `name`.
///
/// Results are sorted by path. Symlinked directories are not followed.
/// Subdirectories that cannot be read for lack of permission are skipped.
pub fn find_files_named(
    root: impl AsRef<Path>,
    name: &str,
    options: MatchOptions,
) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut found = Vec::new();
    walk(root, name, &options, &mut found, true)?;
    found.sort();
    Ok(found)
}

fn walk(
    dir: &Path,
    name: &str,
    options: &MatchOptions,
    found: &mut Vec<PathBuf>,
    is_root: bool,
) -> Result<()> {
    let walk_err = |source| Error::Walk {
        path: dir.to_path_buf(),
        source,
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if !is_root && e.kind() == ErrorKind::PermissionDenied => {
            tracing::warn!(path = %dir.display(), "skipping unreadable directory");
            return Ok(());
        }
        Err(e) => return Err(walk_err(e)),
    };

    for entry in entries {
        let entry = entry.map_err(walk_err)?;
        let ty = entry.file_type().map_err(walk_err)?;
        let path = entry.path();

        if ty.is_dir() {
            walk(&path, name, options, found, false)?;
        } else if options.matches(&entry.file_name(), name) && path.is_file() {
            found.push(path);
        }
    }

    Ok(())
}

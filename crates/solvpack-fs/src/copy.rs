use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug)]
pub struct AtomicCopyOptions {
    pub create_parents:       bool,
    pub preserve_permissions: bool,
}

impl Default for AtomicCopyOptions {
    fn default() -> Self { Self::new() }
}

impl AtomicCopyOptions {
    pub fn new() -> Self {
        Self {
            create_parents:       true,
            preserve_permissions: true,
        }
    }

    pub fn create_parents(mut self, create_parents: bool) -> Self {
        self.create_parents = create_parents;
        self
    }

    pub fn preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }
}

fn staging_file(path: &Path, create_parents: bool) -> Result<NamedTempFile> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        Some(_) => Path::new("."),
        None => return Err(Error::NoParent(path.to_path_buf())),
    };

    if create_parents && !parent.exists() {
        fs::create_dir_all(parent).map_err(|e| Error::CreateDir {
            path:   parent.to_path_buf(),
            source: e,
        })?;
    }

    NamedTempFile::new_in(parent).map_err(|e| Error::Write {
        path:   parent.to_path_buf(),
        source: e,
    })
}

/// Write `content` to `path` through a temp sibling, replacing any existing file.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let mut tmp = staging_file(path, true)?;

    tmp.write_all(content)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| Error::Write {
            path:   tmp.path().to_path_buf(),
            source: e,
        })?;

    tmp.persist(path).map_err(|e| Error::Write {
        path:   path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}

/// Stream into a temp sibling of `path` through `write`, then rename it over `path`.
///
/// Nothing appears at `path` unless `write` succeeds.
pub fn atomic_write_with<T, E, F>(path: impl AsRef<Path>, write: F) -> std::result::Result<T, E>
where
    F: FnOnce(&mut fs::File) -> std::result::Result<T, E>,
    E: From<Error>,
{
    let path = path.as_ref();
    let mut tmp = staging_file(path, true)?;

    let value = write(tmp.as_file_mut())?;
    tmp.as_file().sync_all().map_err(|e| Error::Write {
        path:   tmp.path().to_path_buf(),
        source: e,
    })?;

    tmp.persist(path).map_err(|e| Error::Write {
        path:   path.to_path_buf(),
        source: e.error,
    })?;
    Ok(value)
}

/// Copy `src` to `dest` through a temp sibling and return the number of bytes copied.
///
/// Re-running with the same arguments leaves the same bytes at `dest`.
pub fn atomic_copy(
    src: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    options: AtomicCopyOptions,
) -> Result<u64> {
    let src = src.as_ref();
    let dest = dest.as_ref();
    let copy_err = |source| Error::Copy {
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        source,
    };

    let mut reader = fs::File::open(src).map_err(|e| Error::Read {
        path:   src.to_path_buf(),
        source: e,
    })?;
    let mut tmp = staging_file(dest, options.create_parents)?;

    let copied = std::io::copy(&mut reader, tmp.as_file_mut()).map_err(copy_err)?;
    tmp.as_file().sync_all().map_err(copy_err)?;

    if options.preserve_permissions {
        let perms = reader
            .metadata()
            .map_err(|e| Error::Read {
                path:   src.to_path_buf(),
                source: e,
            })?
            .permissions();
        fs::set_permissions(tmp.path(), perms).map_err(copy_err)?;
    }

    tmp.persist(dest).map_err(|e| copy_err(e.error))?;
    tracing::debug!(from = %src.display(), to = %dest.display(), bytes = copied, "copied file");

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_with_failure_leaves_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/release.zip");

        let result: std::result::Result<(), Error> =
            atomic_write_with(&path, |_| Err(Error::NoParent(PathBuf::from("x"))));
        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path().join("out")).unwrap().count(), 0);

        let len = atomic_write_with(&path, |file| -> Result<usize> {
            file.write_all(b"PK")?;
            Ok(2)
        })
        .unwrap();
        assert_eq!(len, 2);
        assert_eq!(fs::read(&path).unwrap(), b"PK");
    }

    #[test]
    fn test_atomic_write_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/out.json");
        atomic_write(&path, b"{}").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"{}");
    }

    #[test]
    fn test_atomic_copy_overwrites() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.bin");
        let dest = dir.path().join("out/dest.bin");
        fs::write(&src, b"new bytes").unwrap();
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(&dest, b"a much longer stale payload").unwrap();

        let copied = atomic_copy(&src, &dest, AtomicCopyOptions::new()).unwrap();

        assert_eq!(copied, 9);
        assert_eq!(fs::read(&dest).unwrap(), b"new bytes");
    }

    #[test]
    fn test_atomic_copy_missing_source() {
        let dir = tempdir().unwrap();
        let result = atomic_copy(
            dir.path().join("nope"),
            dir.path().join("dest"),
            AtomicCopyOptions::new(),
        );
        assert!(matches!(result, Err(Error::Read { .. })));
    }

    #[test]
    fn test_atomic_copy_without_parents() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::write(&src, b"x").unwrap();
        let result = atomic_copy(
            &src,
            dir.path().join("missing/dest"),
            AtomicCopyOptions::new().create_parents(false),
        );
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_copy_keeps_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let src = dir.path().join("cbc");
        let dest = dir.path().join("bundle/cbc");
        fs::write(&src, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o755)).unwrap();

        atomic_copy(&src, &dest, AtomicCopyOptions::new()).unwrap();

        let mode = fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

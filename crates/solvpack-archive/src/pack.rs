use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{Error, Result};

#[derive(Clone, Debug)]
pub struct PackReport {
    pub archive: PathBuf,
    pub file_count: usize,
    pub total_bytes: u64,
}

/// Zip the contents of `src_dir` into `dest`.
///
/// Entries are sorted and stamped with the zip epoch so the same tree always
/// produces the same bytes.
pub fn pack_dir(src_dir: &Path, dest: &Path) -> Result<PackReport> {
    // a previous archive written inside the tree is not packed again
    let skip = std::path::absolute(dest).map_err(|e| Error::PackFailed {
        path:   dest.to_path_buf(),
        source: e,
    })?;
    let mut files = Vec::new();
    collect(src_dir, src_dir, &skip, &mut files)?;
    files.sort();

    let (file_count, total_bytes) =
        solvpack_fs::atomic_write_with(dest, |file| write_entries(file, src_dir, &files))?;
    tracing::info!(archive = %dest.display(), files = file_count, "packed directory");

    Ok(PackReport {
        archive: dest.to_path_buf(),
        file_count,
        total_bytes,
    })
}

fn write_entries<W: Write + Seek>(
    sink: &mut W,
    root: &Path,
    files: &[PathBuf],
) -> Result<(usize, u64)> {
    let mut writer = ZipWriter::new(sink);
    let mut total = 0u64;

    for rel in files {
        let full = root.join(rel);
        let pack_err = |source| Error::PackFailed {
            path: full.clone(),
            source,
        };

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(file_mode(&full).map_err(pack_err)?);

        writer.start_file(entry_name(rel), options)?;
        let mut input = fs::File::open(&full).map_err(pack_err)?;
        total += std::io::copy(&mut input, &mut writer).map_err(pack_err)?;
    }

    writer.finish()?;
    Ok((files.len(), total))
}

fn collect(root: &Path, dir: &Path, skip: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let read_err = |source| Error::PackFailed {
        path: dir.to_path_buf(),
        source,
    };

    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if entry.file_type().map_err(read_err)?.is_dir() {
            collect(root, &path, skip, out)?;
        } else if std::path::absolute(&path).is_ok_and(|p| p == skip) {
            continue;
        } else if let Ok(rel) = path.strip_prefix(root) {
            out.push(rel.to_path_buf());
        }
    }
    Ok(())
}

fn entry_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn file_mode(path: &Path) -> std::io::Result<u32> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::metadata(path)?.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn file_mode(_path: &Path) -> std::io::Result<u32> { Ok(0o644) }

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn entry_names_use_forward_slashes() {
        let rel: PathBuf = ["_internal", "solver", "cbc.exe"].iter().collect();
        assert_eq!(entry_name(&rel), "_internal/solver/cbc.exe");
    }

    #[test]
    fn archive_inside_source_is_not_repacked() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("dist");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("app.exe"), b"app").unwrap();
        let dest = src.join("app.zip");

        let first = pack_dir(&src, &dest).unwrap();
        let first_bytes = fs::read(&dest).unwrap();
        let second = pack_dir(&src, &dest).unwrap();

        assert_eq!(first.file_count, 1);
        assert_eq!(second.file_count, 1);
        assert_eq!(fs::read(&dest).unwrap(), first_bytes);
        let names: Vec<_> = fs::read_dir(&src).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn pack_is_deterministic() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("dist");
        fs::create_dir_all(src.join("_internal")).unwrap();
        fs::write(src.join("app.exe"), b"app").unwrap();
        fs::write(src.join("_internal/cbc.exe"), b"solver").unwrap();

        let first = pack_dir(&src, &dir.path().join("a.zip")).unwrap();
        let second = pack_dir(&src, &dir.path().join("b.zip")).unwrap();

        assert_eq!(first.file_count, 2);
        assert_eq!(first.total_bytes, 9);
        assert_eq!(
            fs::read(&first.archive).unwrap(),
            fs::read(&second.archive).unwrap()
        );
    }
}

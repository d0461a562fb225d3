use std::fs;
use std::io::{Read, Seek};
use std::path::Path;

use crate::detect::{ArchiveFormat, detect_from_reader};
use crate::error::{Error, Result};
use crate::report::{ExtractReport, ExtractedEntry};
use crate::sanitize::sanitize_entry_path;

#[derive(Clone, Copy, Debug)]
pub struct ExtractOptions {
    pub strip_components: usize,
    pub apply_permissions: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            strip_components: 0,
            apply_permissions: true,
        }
    }
}

impl ExtractOptions {
    pub fn strip_components(mut self, n: usize) -> Self {
        self.strip_components = n;
        self
    }

    pub fn apply_permissions(mut self, yes: bool) -> Self {
        self.apply_permissions = yes;
        self
    }
}

/// Extract every entry of a zip archive under `dest`.
pub fn extract_zip<R: Read + Seek>(
    reader: R,
    dest: &Path,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut report = ExtractReport::default();

    fs::create_dir_all(dest).map_err(|e| Error::ExtractionFailed {
        path:   dest.to_path_buf(),
        source: e,
    })?;

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let name = file.name().to_string();

        if options.strip_components > 0 && file.is_dir() {
            // leading directories vanish under stripping
            let depth = name.trim_end_matches(['/', '\\']).split(['/', '\\']).count();
            if depth <= options.strip_components {
                continue;
            }
        }

        let target = sanitize_entry_path(&name, dest, options.strip_components)?;
        let extract_err = |source| Error::ExtractionFailed {
            path: target.clone(),
            source,
        };

        if file.is_dir() {
            fs::create_dir_all(&target).map_err(extract_err)?;
            report.push(ExtractedEntry {
                original_name: name,
                target_path: target,
                size: 0,
                permissions: None,
                is_directory: true,
            });
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(extract_err)?;
        }

        let mut out = fs::File::create(&target).map_err(extract_err)?;
        let written = std::io::copy(&mut file, &mut out).map_err(extract_err)?;
        let mode = file.unix_mode();

        #[cfg(unix)]
        if options.apply_permissions {
            if let Some(mode) = mode {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&target, fs::Permissions::from_mode(mode & 0o7777))
                    .map_err(extract_err)?;
            }
        }

        tracing::trace!(entry = %name, bytes = written, "extracted");
        report.push(ExtractedEntry {
            original_name: name,
            target_path: target,
            size: written,
            permissions: mode,
            is_directory: false,
        });
    }

    tracing::debug!(
        dest = %dest.display(),
        entries = report.entry_count,
        bytes = report.total_bytes,
        "zip extracted"
    );
    Ok(report)
}

/// Extract a zip file from disk, rejecting payloads that are not zip archives.
pub fn extract_zip_file(
    archive: &Path,
    dest: &Path,
    options: &ExtractOptions,
) -> Result<ExtractReport> {
    let mut file = fs::File::open(archive).map_err(|e| Error::ExtractionFailed {
        path:   archive.to_path_buf(),
        source: e,
    })?;

    match detect_from_reader(&mut file)? {
        Some(ArchiveFormat::Zip) => extract_zip(file, dest, options),
        None => Err(Error::NotAnArchive(archive.to_path_buf())),
    }
}

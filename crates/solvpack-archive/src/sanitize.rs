use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve an archive entry name against `base`, refusing anything that lands outside it.
///
/// Backslashes are treated as separators since Windows-built archives use them.
pub fn sanitize_entry_path(entry_name: &str, base: &Path, strip_components: usize) -> Result<PathBuf> {
    if entry_name.contains('\0') {
        return Err(Error::InvalidPath(entry_name.replace('\0', "\\0")));
    }

    let unified = entry_name.replace('\\', "/");
    let entry_path = Path::new(&unified);

    if entry_path.has_root() || looks_like_drive(&unified) {
        return Err(Error::ZipSlip {
            entry:    PathBuf::from(entry_name),
            resolved: entry_path.to_path_buf(),
        });
    }

    let normalized = normalize_relative(entry_path).ok_or_else(|| Error::ZipSlip {
        entry:    PathBuf::from(entry_name),
        resolved: base.join(entry_path),
    })?;

    let processed = if strip_components > 0 {
        strip(&normalized, strip_components)?
    } else {
        normalized
    };

    Ok(base.join(processed))
}

fn looks_like_drive(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Fold `.` and `..`; `None` if `..` climbs above the start.
fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.iter().collect())
}

fn strip(path: &Path, count: usize) -> Result<PathBuf> {
    let components: Vec<_> = path.components().collect();
    if components.len() <= count {
        return Err(Error::NoComponentsRemaining {
            original: path.to_path_buf(),
            count,
        });
    }
    Ok(components[count..].iter().collect())
}

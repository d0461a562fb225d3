use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::{Error, Result};

pub fn modified(path: impl AsRef<Path>) -> Result<SystemTime> {
    let path = path.as_ref();
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| Error::Read {
            path:   path.to_path_buf(),
            source: e,
        })
}

/// Set the modification time of an existing file.
pub fn set_modified(path: impl AsRef<Path>, time: SystemTime) -> Result<()> {
    let path = path.as_ref();
    let set_err = |source| Error::SetModified {
        path: path.to_path_buf(),
        source,
    };

    // Windows requires write access to update file times.
    let file = fs::File::options().write(true).open(path).map_err(set_err)?;
    file.set_modified(time).map_err(set_err)?;
    Ok(())
}

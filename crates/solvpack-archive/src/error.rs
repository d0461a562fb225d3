use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a zip archive: '{0}'")]
    NotAnArchive(PathBuf),

    #[error("zip-slip attack detected: entry '{entry}' resolves to '{resolved}'")]
    ZipSlip { entry: PathBuf, resolved: PathBuf },

    #[error("entry path contains null byte: '{0}'")]
    InvalidPath(String),

    #[error("strip_components({count}) removed all path components from '{original}'")]
    NoComponentsRemaining { original: PathBuf, count: usize },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to pack '{path}': {source}")]
    PackFailed { path: PathBuf, source: io::Error },

    #[error("archive is corrupted: {0}")]
    Corrupted(#[from] zip::result::ZipError),

    #[error(transparent)]
    Fs(#[from] solvpack_fs::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

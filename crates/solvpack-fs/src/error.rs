use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: std::io::Error },

    #[error("failed to copy '{from}' to '{to}': {source}")]
    Copy {
        from:   PathBuf,
        to:     PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: std::io::Error },

    #[error("failed to walk '{path}': {source}")]
    Walk { path: PathBuf, source: std::io::Error },

    #[error("failed to set modification time of '{path}': {source}")]
    SetModified { path: PathBuf, source: std::io::Error },

    #[error("path has no parent directory: '{0}'")]
    NoParent(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

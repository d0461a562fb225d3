use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown architecture: {0}")]
    UnknownArch(String),

    #[error("unknown operating system: {0}")]
    UnknownOs(String),

    #[error("invalid target '{0}', expected <os> or <os>-<arch>")]
    InvalidTarget(String),
}

//! Error taxonomy for the engine. Each variant maps to one reason string
//! a front-end prints in its `progname: path: reason` diagnostic line.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument")]
    InvalidArgument,
    #[error("No such file or directory")]
    NotFound,
    #[error("File exists")]
    AlreadyExists,
    #[error("Is a directory")]
    IsADirectory,
    #[error("Not a directory")]
    NotADirectory,
    #[error("File name too long")]
    NameTooLong,
    #[error("No space left on device")]
    NoSpace,
    #[error("{0}")]
    HostIo(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

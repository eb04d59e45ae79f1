//! Fatal errors for an aggregation run.
//!
//! Record-level problems (malformed lines, unconvertible counts) never show up
//! here; they are logged and counted in [`crate::aggregate::PassStats`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AggregateError>;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("output directory {} is not usable: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode output record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("no {0} path given on the command line or in the config file")]
    MissingPath(&'static str),
}

impl AggregateError {
    /// Classify an I/O failure while opening or reading the input file.
    pub fn from_input(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            AggregateError::InputNotFound(path)
        } else {
            AggregateError::Read { path, source }
        }
    }
}

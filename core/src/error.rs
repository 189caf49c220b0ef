use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GerpError>;

/// Failures surfaced by the scanner, the hash table, and the index.
///
/// Build-time errors are fatal to index construction: no partial index is
/// retained. Query-time lookup misses are ordinary output, not errors; the
/// only query-time failure that propagates is an inability to re-open a
/// previously indexed file.
#[derive(Debug, Error)]
pub enum GerpError {
    /// A directory could not be opened for enumeration.
    #[error("directory not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// A filesystem entry that is neither a regular file nor a directory.
    #[error("invalid entry: {}", .path.display())]
    InvalidEntry { path: PathBuf },

    /// A discovered file could not be opened for reading.
    #[error("could not open {}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Fail-fast hash table lookup on a missing key.
    #[error("key not in table: {0}")]
    KeyNotFound(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    /// Aggregate returned by [`crate::Index::new`]; the cause is one of the
    /// build-time variants above.
    #[error("could not build index")]
    Build(#[source] Box<GerpError>),
}

impl GerpError {
    pub(crate) fn into_build(self) -> GerpError {
        match self {
            err @ GerpError::Build(_) => err,
            err => GerpError::Build(Box::new(err)),
        }
    }
}

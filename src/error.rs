// src/error.rs

use thiserror::Error;

/// Fatal pipeline errors. Everything else (empty tiles, unstitchable
/// boundaries, degenerate thresholds) is recoverable and surfaced through
/// reports and warnings instead.
#[derive(Error, Debug)]
pub enum MeshError {
    /// An unparsable `v`/`f` record, or a face index outside the file's
    /// vertex list. `line` is 1-based.
    #[error("malformed record at line {line}: {content:?}")]
    MalformedRecord { line: usize, content: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

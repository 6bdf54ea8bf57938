use std::path::PathBuf;

use thiserror::Error;

use crate::source::SourceError;
use tickstash_store::StoreError;

/// Validation and contract errors exposed by `tickstash-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("session date must be YYYY-MM-DD: '{value}'")]
    InvalidSessionDate { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
}

/// Run-level error taxonomy for the collection pipeline.
///
/// Every variant is a terminal abort of the current run; there are no
/// retries. The empty-dataset case is deliberately absent: it is a
/// recognized outcome, not an error (see [`crate::pipeline::RunOutcome`]).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Market-data provider failed (network, upstream status, bad payload).
    #[error("provider error: {0}")]
    Provider(#[from] SourceError),

    /// Structured-store write failed. Ordered before any table or chart
    /// work, so nothing else has been produced when this surfaces.
    #[error("store write failed: {0}")]
    StoreWrite(#[from] StoreError),

    /// Local disk read/write failed for the table or the chart.
    #[error("local i/o failed for {}: {source}", .path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Existing history file could not be parsed.
    #[error("history file {} is malformed at line {line}: {reason}", .path.display())]
    MalformedHistory {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Chart rendering failed.
    #[error("chart rendering failed for {}: {reason}", .path.display())]
    ChartRender { path: PathBuf, reason: String },

    /// Object-store upload failed. Local artifacts and the store entity are
    /// left in place for manual or next-run recovery.
    #[error("upload of '{key}' failed: {reason}")]
    Upload { key: String, reason: String },
}

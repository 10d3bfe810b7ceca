use std::path::PathBuf;

use thiserror::Error;

use crate::rdl::SyntaxError;

/// Convenience result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Error type returned by parsing, execution and catalog functions.
///
/// A single enum shared across the RDL parser, the report executor and the data sources. None of
/// these errors is retried internally; the caller decides the retry policy.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Malformed RDL source (unexpected token, missing delimiter, unrecognized operator).
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// The data source rejected the query (connectivity, SQL error, parameter count/types).
    #[error("query error: {message}")]
    Query { message: String },

    /// A result record could not be decoded into scalar values.
    #[error("scan error at record {row}: {message}")]
    Scan { row: usize, message: String },

    /// A declared parameter name had no value in a named binding.
    #[error("missing value for parameter '{name}'")]
    MissingParam { name: String },

    /// CSV rendering error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON rendering error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying I/O error (e.g. a report file could not be read).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A report definition file failed to parse.
    #[error("invalid report definition {}: {source}", path.display())]
    Definition {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    /// Two report definition files declare the same report name.
    #[error("duplicate report '{name}' in {} and {}", first.display(), second.display())]
    DuplicateReport {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Invalid catalog glob pattern.
    #[error("glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A path matched by a catalog glob pattern could not be read.
    #[error("glob read error: {0}")]
    GlobRead(#[from] glob::GlobError),

    /// Directory traversal error while loading a catalog.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The batch runner's worker pool could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ReportError {
    /// Build a [`ReportError::Query`] from anything displayable.
    pub fn query(message: impl ToString) -> Self {
        Self::Query {
            message: message.to_string(),
        }
    }

    /// Build a [`ReportError::Scan`] for the 0-based record `row`.
    pub fn scan(row: usize, message: impl ToString) -> Self {
        Self::Scan {
            row,
            message: message.to_string(),
        }
    }
}

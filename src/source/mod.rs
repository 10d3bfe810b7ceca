//! Data source contract consumed by the report executor.
//!
//! A [`DataSource`] runs a parameterized query and hands the executor a [`Cursor`] over the
//! result. The cursor only lives for the duration of [`DataSource::with_cursor`], so it is
//! released on every exit path, including early error returns from the executor's callback.
//!
//! Implementations:
//!
//! - [`MemoryDataSource`]: canned results per query, for tests and demos
//! - [`SqliteDataSource`] (feature `sqlite`): a rusqlite connection

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::{MemoryDataSource, MemoryResult};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDataSource;

use crate::error::ReportResult;
use crate::types::Value;

/// A raw value as produced by a data source, before the executor decodes it into a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum SourceValue {
    /// SQL `NULL`.
    Null,
    /// Integer.
    Integer(i64),
    /// Floating point number.
    Real(f64),
    /// Text.
    Text(String),
    /// Binary/opaque value; decoded to its string representation.
    Bytes(Vec<u8>),
}

impl SourceValue {
    /// Decode into a row [`Value`]. Bytes are read as UTF-8, replacing invalid sequences.
    pub fn decode(self) -> Value {
        match self {
            SourceValue::Null => Value::Null,
            SourceValue::Integer(v) => Value::Int64(v),
            SourceValue::Real(v) => Value::Float64(v),
            SourceValue::Text(s) => Value::Utf8(s),
            SourceValue::Bytes(b) => match String::from_utf8(b) {
                Ok(s) => Value::Utf8(s),
                Err(e) => Value::Utf8(String::from_utf8_lossy(e.as_bytes()).into_owned()),
            },
        }
    }
}

impl From<Value> for SourceValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => SourceValue::Null,
            Value::Int64(v) => SourceValue::Integer(v),
            Value::Float64(v) => SourceValue::Real(v),
            Value::Utf8(s) => SourceValue::Text(s),
        }
    }
}

/// An open result set.
pub trait Cursor {
    /// Result column names, in positional order.
    fn columns(&self) -> &[String];

    /// Fetch the next record, aligned with [`Cursor::columns`].
    ///
    /// Returns `Ok(None)` once the result set is exhausted and
    /// [`crate::ReportError::Scan`] if the record cannot be decoded.
    fn next_record(&mut self) -> ReportResult<Option<Vec<SourceValue>>>;
}

/// Something that can run a parameterized query.
///
/// One handle may be shared by several executors (and threads); its own concurrency contract
/// governs what that means for the underlying connection.
pub trait DataSource: Send + Sync {
    /// Run `query` with positional `params` and pass the open cursor to `visit`.
    ///
    /// The cursor is released before this returns, whatever `visit` returns. `visit` runs caller
    /// code (row processes) and may query the same source again from the same thread.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ReportError::Query`] if the query or its parameters are rejected, and
    /// propagates any error returned by `visit`.
    fn with_cursor(
        &self,
        query: &str,
        params: &[Value],
        visit: &mut dyn FnMut(&mut dyn Cursor) -> ReportResult<()>,
    ) -> ReportResult<()>;
}

impl<S: DataSource + ?Sized> DataSource for &S {
    fn with_cursor(
        &self,
        query: &str,
        params: &[Value],
        visit: &mut dyn FnMut(&mut dyn Cursor) -> ReportResult<()>,
    ) -> ReportResult<()> {
        (**self).with_cursor(query, params, visit)
    }
}

impl<S: DataSource + ?Sized> DataSource for std::sync::Arc<S> {
    fn with_cursor(
        &self,
        query: &str,
        params: &[Value],
        visit: &mut dyn FnMut(&mut dyn Cursor) -> ReportResult<()>,
    ) -> ReportResult<()> {
        (**self).with_cursor(query, params, visit)
    }
}

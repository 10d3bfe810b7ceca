//! In-memory data source with canned results.
//!
//! Results are registered per exact query string. The source records every call and counts
//! opened/released cursors, which makes it convenient for asserting executor behavior.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::{ReportError, ReportResult};
use crate::types::Value;

use super::{Cursor, DataSource, SourceValue};

/// A canned result set for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryResult {
    columns: Vec<String>,
    records: Vec<Result<Vec<SourceValue>, String>>,
    expected_params: Option<usize>,
}

impl MemoryResult {
    /// Create an empty result with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            records: Vec::new(),
            expected_params: None,
        }
    }

    /// Append a record, aligned with the column names.
    pub fn row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SourceValue>,
    {
        self.records
            .push(Ok(values.into_iter().map(Into::into).collect()));
        self
    }

    /// Append a record that fails to decode with `message`.
    pub fn failing_row(mut self, message: impl Into<String>) -> Self {
        self.records.push(Err(message.into()));
        self
    }

    /// Reject calls that do not bind exactly `count` parameters.
    pub fn expect_params(mut self, count: usize) -> Self {
        self.expected_params = Some(count);
        self
    }
}

/// A recorded call to [`MemoryDataSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryCall {
    /// Query string as passed by the executor.
    pub query: String,
    /// Bound parameter values.
    pub params: Vec<Value>,
}

/// Data source backed by canned [`MemoryResult`]s.
#[derive(Default)]
pub struct MemoryDataSource {
    results: HashMap<String, MemoryResult>,
    calls: Mutex<Vec<MemoryCall>>,
    opened: AtomicUsize,
    released: AtomicUsize,
}

impl MemoryDataSource {
    /// Create a source with no registered queries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the result returned for `query`.
    pub fn with_result(mut self, query: impl Into<String>, result: MemoryResult) -> Self {
        self.results.insert(query.into(), result);
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<MemoryCall> {
        self.calls.lock().clone()
    }

    /// Number of cursors opened so far.
    pub fn opened_cursors(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Number of cursors released so far.
    pub fn released_cursors(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for MemoryDataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDataSource")
            .field("queries", &self.results.len())
            .field("calls", &self.calls.lock().len())
            .field("opened", &self.opened_cursors())
            .field("released", &self.released_cursors())
            .finish()
    }
}

impl DataSource for MemoryDataSource {
    fn with_cursor(
        &self,
        query: &str,
        params: &[Value],
        visit: &mut dyn FnMut(&mut dyn Cursor) -> ReportResult<()>,
    ) -> ReportResult<()> {
        self.calls.lock().push(MemoryCall {
            query: query.to_string(),
            params: params.to_vec(),
        });

        let result = self
            .results
            .get(query)
            .ok_or_else(|| ReportError::query(format!("no result registered for query '{query}'")))?;

        if let Some(expected) = result.expected_params {
            if expected != params.len() {
                return Err(ReportError::query(format!(
                    "expected {expected} parameters, got {}",
                    params.len()
                )));
            }
        }

        self.opened.fetch_add(1, Ordering::SeqCst);
        let mut cursor = MemoryCursor {
            columns: &result.columns,
            records: result.records.iter(),
            index: 0,
            released: &self.released,
        };
        visit(&mut cursor)
    }
}

struct MemoryCursor<'a> {
    columns: &'a [String],
    records: std::slice::Iter<'a, Result<Vec<SourceValue>, String>>,
    index: usize,
    released: &'a AtomicUsize,
}

impl Cursor for MemoryCursor<'_> {
    fn columns(&self) -> &[String] {
        self.columns
    }

    fn next_record(&mut self) -> ReportResult<Option<Vec<SourceValue>>> {
        let index = self.index;
        match self.records.next() {
            None => Ok(None),
            Some(Ok(values)) => {
                self.index += 1;
                Ok(Some(values.clone()))
            }
            Some(Err(message)) => Err(ReportError::scan(index, message)),
        }
    }
}

impl Drop for MemoryCursor<'_> {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

//! SQLite data source.

use std::path::Path;

use parking_lot::ReentrantMutex;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{Connection, Rows, ToSql};

use crate::error::{ReportError, ReportResult};
use crate::types::Value;

use super::{Cursor, DataSource, SourceValue};

/// A [`DataSource`] over a single rusqlite [`Connection`].
///
/// The connection is guarded by a reentrant lock. Executors on different threads run their
/// queries one at a time; code running inside a cursor visit (a row process, a nested report)
/// may query the same handle again from that thread.
pub struct SqliteDataSource {
    conn: ReentrantMutex<Connection>,
}

impl SqliteDataSource {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> ReportResult<Self> {
        let conn = Connection::open(path).map_err(ReportError::query)?;
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> ReportResult<Self> {
        let conn = Connection::open_in_memory().map_err(ReportError::query)?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: ReentrantMutex::new(conn),
        }
    }

    /// Execute one or more `;`-separated statements (schema setup, fixtures).
    pub fn execute_batch(&self, sql: &str) -> ReportResult<()> {
        self.conn.lock().execute_batch(sql).map_err(ReportError::query)
    }
}

impl DataSource for SqliteDataSource {
    fn with_cursor(
        &self,
        query: &str,
        params: &[Value],
        visit: &mut dyn FnMut(&mut dyn Cursor) -> ReportResult<()>,
    ) -> ReportResult<()> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(query).map_err(ReportError::query)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(ReportError::query)?;

        let mut cursor = SqliteCursor {
            columns,
            rows,
            index: 0,
        };
        visit(&mut cursor)
    }
}

struct SqliteCursor<'stmt> {
    columns: Vec<String>,
    rows: Rows<'stmt>,
    index: usize,
}

impl Cursor for SqliteCursor<'_> {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next_record(&mut self) -> ReportResult<Option<Vec<SourceValue>>> {
        let index = self.index;
        let width = self.columns.len();
        let row = match self.rows.next() {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(None),
            Err(e) => return Err(ReportError::scan(index, e)),
        };

        let mut values = Vec::with_capacity(width);
        for i in 0..width {
            let value = row.get_ref(i).map_err(|e| ReportError::scan(index, e))?;
            values.push(source_value(value));
        }
        self.index += 1;
        Ok(Some(values))
    }
}

fn source_value(value: ValueRef<'_>) -> SourceValue {
    match value {
        ValueRef::Null => SourceValue::Null,
        ValueRef::Integer(v) => SourceValue::Integer(v),
        ValueRef::Real(v) => SourceValue::Real(v),
        ValueRef::Text(bytes) => SourceValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => SourceValue::Bytes(bytes.to_vec()),
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Int64(v) => ToSqlOutput::Borrowed(ValueRef::Integer(*v)),
            Value::Float64(v) => ToSqlOutput::Borrowed(ValueRef::Real(*v)),
            Value::Utf8(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

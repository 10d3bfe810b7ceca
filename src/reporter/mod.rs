//! The report executor.
//!
//! A [`Reporter`] binds a query, its positional parameters, row processes, columns and a
//! visualizer to a [`DataSource`]. [`Reporter::run`] fetches and transforms the result set;
//! [`Reporter::output`] renders it.
//!
//! ```rust
//! use rapid_reporter::processing::{Operator, RowProcess};
//! use rapid_reporter::source::{MemoryDataSource, MemoryResult};
//! use rapid_reporter::types::{Column, Value};
//! use rapid_reporter::Reporter;
//!
//! # fn main() -> Result<(), rapid_reporter::ReportError> {
//! let source = MemoryDataSource::new().with_result(
//!     "SELECT qty, price FROM lines",
//!     MemoryResult::new(["qty", "price"]).row([Value::Int64(2), Value::Int64(5)]),
//! );
//!
//! let mut report = Reporter::new(&source)
//!     .query("SELECT qty, price FROM lines")
//!     .row_process(RowProcess::new("total", ["qty", "price"], Operator::Mul).compile())
//!     .columns(vec![Column::new("Total", "total").with_total()]);
//! report.run()?;
//!
//! assert_eq!(
//!     report.output(),
//!     "<table><thead><tr><th>Total</th></tr></thead><tbody><tr><td>10</td></tr></tbody>\
//!      <tfoot><tr><td>10</td></tr></tfoot></table>"
//! );
//! # Ok(())
//! # }
//! ```

mod observability;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{ReportError, ReportResult};
use crate::processing::RowProcessFn;
use crate::rdl::ReportDescriptor;
use crate::render::{table_visualizer, OutputFormat, Visualizer};
use crate::source::{DataSource, SourceValue};
use crate::types::{Column, Row, Value};

pub use observability::{
    CompositeObserver, FileObserver, ReportContext, ReportObserver, ReportOptions, ReportSeverity,
    RunStats, StdErrObserver,
};

/// Runs one report against a data source and renders the result.
///
/// Setters consume and return the executor so they chain. Each setter replaces the previous
/// value, except [`Reporter::row_process`], which appends.
///
/// An instance is meant for one in-flight [`Reporter::run`] at a time. Concurrent reports use
/// separate instances, which may share the data source.
pub struct Reporter<'a> {
    source: &'a dyn DataSource,
    name: String,
    query: String,
    params: Vec<Value>,
    processes: Vec<RowProcessFn>,
    columns: Vec<Column>,
    visualizer: Visualizer,
    options: ReportOptions,
    rows: Vec<Row>,
}

impl<'a> Reporter<'a> {
    /// Create an executor with an empty query, no parameters, processes or columns, and the
    /// default HTML table visualizer.
    pub fn new(source: &'a dyn DataSource) -> Self {
        Self {
            source,
            name: String::new(),
            query: String::new(),
            params: Vec::new(),
            processes: Vec::new(),
            columns: Vec::new(),
            visualizer: Arc::new(table_visualizer),
            options: ReportOptions::default(),
            rows: Vec::new(),
        }
    }

    /// Create an executor configured from a parsed report definition.
    ///
    /// Binds the name, query, compiled row processes and columns. Parameter values are not part
    /// of a definition; set them with [`Reporter::params`] (see
    /// [`ReportDescriptor::bind_params`] for named values).
    pub fn from_descriptor(source: &'a dyn DataSource, descriptor: &ReportDescriptor) -> Self {
        let reporter = Self::new(source)
            .name(descriptor.name.clone())
            .query(descriptor.query.clone())
            .columns(descriptor.columns.clone());
        descriptor
            .row_processes
            .iter()
            .fold(reporter, |r, p| r.row_process(p.compile()))
    }

    /// Set the report name used in observer events.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the query.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set the positional parameter values.
    pub fn params<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.params = values.into_iter().map(Into::into).collect();
        self
    }

    /// Append a row process. Processes run in registration order.
    pub fn row_process(mut self, process: RowProcessFn) -> Self {
        self.processes.push(process);
        self
    }

    /// Set the output columns.
    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Set the visualizer used by [`Reporter::output`].
    pub fn visualizer(mut self, visualizer: Visualizer) -> Self {
        self.visualizer = visualizer;
        self
    }

    /// Replace the run options.
    pub fn with_options(mut self, options: ReportOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach an observer for run outcomes.
    pub fn with_observer(mut self, observer: Arc<dyn ReportObserver>) -> Self {
        self.options.observer = Some(observer);
        self
    }

    /// Execute the query and accumulate the transformed rows.
    ///
    /// Each record becomes a [`Row`] keyed by the result column names (binary values are decoded
    /// to text), every row process is applied in order, and the row is appended in source order.
    /// A run replaces the rows of any earlier run.
    ///
    /// # Errors
    ///
    /// - [`ReportError::Query`] if the data source rejects the query or its parameters
    /// - [`ReportError::Scan`] if a record cannot be decoded; rows fetched before it are
    ///   discarded and the row set is left empty
    pub fn run(&mut self) -> ReportResult<&mut Self> {
        let start = Instant::now();
        self.rows.clear();

        let fetched = self.fetch();
        let stats = RunStats {
            rows: fetched.as_ref().map_or(0, Vec::len),
            elapsed: start.elapsed(),
        };
        if self.options.observer.is_some() {
            self.options.notify(&self.context(), &fetched, stats);
        }

        self.rows = fetched?;
        Ok(self)
    }

    fn fetch(&self) -> ReportResult<Vec<Row>> {
        let mut rows = Vec::new();
        self.source
            .with_cursor(&self.query, &self.params, &mut |cursor| {
                let columns = cursor.columns().to_vec();
                while let Some(record) = cursor.next_record()? {
                    if record.len() != columns.len() {
                        return Err(ReportError::scan(
                            rows.len(),
                            format!(
                                "record has {} values for {} columns",
                                record.len(),
                                columns.len()
                            ),
                        ));
                    }
                    let mut row: Row = columns
                        .iter()
                        .map(String::as_str)
                        .zip(record.into_iter().map(SourceValue::decode))
                        .collect();
                    for process in &self.processes {
                        process(&mut row);
                    }
                    rows.push(row);
                }
                Ok(())
            })?;
        Ok(rows)
    }

    /// Render the accumulated rows with the configured visualizer.
    ///
    /// Before any successful run this renders an empty row set.
    pub fn output(&self) -> String {
        (self.visualizer)(&self.rows, &self.columns)
    }

    /// Render the accumulated rows with one of the built-in formats.
    pub fn render(&self, format: OutputFormat) -> String {
        format.render(&self.rows, &self.columns)
    }

    /// Rows accumulated by the last run, in source order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Configured output columns.
    pub fn column_defs(&self) -> &[Column] {
        &self.columns
    }

    /// Describe this executor for observer callbacks.
    pub fn context(&self) -> ReportContext {
        ReportContext {
            name: self.name.clone(),
            query: self.query.clone(),
            params: self.params.clone(),
        }
    }
}

impl fmt::Debug for Reporter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("name", &self.name)
            .field("query", &self.query)
            .field("params", &self.params)
            .field("processes", &self.processes.len())
            .field("columns", &self.columns)
            .field("options", &self.options)
            .field("rows", &self.rows.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::{ReportContext, ReportObserver, ReportSeverity, Reporter, RunStats};
    use crate::error::ReportError;
    use crate::source::{MemoryDataSource, MemoryResult, SourceValue};
    use crate::types::{Column, Row, Value};

    const QUERY: &str = "SELECT id, name FROM users WHERE age > ?";

    fn users() -> MemoryDataSource {
        MemoryDataSource::new().with_result(
            QUERY,
            MemoryResult::new(["id", "name"])
                .expect_params(1)
                .row([SourceValue::Integer(1), SourceValue::Bytes(b"John Doe".to_vec())])
                .row([SourceValue::Integer(2), SourceValue::Text("Jane".to_string())]),
        )
    }

    #[derive(Default)]
    struct Counting {
        ok: AtomicUsize,
        failed: AtomicUsize,
        alerts: AtomicUsize,
    }

    impl ReportObserver for Counting {
        fn on_success(&self, _ctx: &ReportContext, _stats: RunStats) {
            self.ok.fetch_add(1, Ordering::SeqCst);
        }

        fn on_failure(&self, _ctx: &ReportContext, _s: ReportSeverity, _e: &ReportError) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }

        fn on_alert(&self, _ctx: &ReportContext, _s: ReportSeverity, _e: &ReportError) {
            self.alerts.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn run_decodes_bytes_and_keeps_source_order() {
        let source = users();
        let mut report = Reporter::new(&source).query(QUERY).params([18]);
        report.run().unwrap();

        let rows = report.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some(&Value::from("John Doe")));
        assert_eq!(rows[1].get("id"), Some(&Value::Int64(2)));
        assert_eq!(source.calls()[0].params, vec![Value::Int64(18)]);
        assert_eq!(source.released_cursors(), 1);
    }

    #[test]
    fn setters_replace_except_row_process() {
        let source = users();
        let mut report = Reporter::new(&source)
            .query("SELECT nothing")
            .query(QUERY)
            .params([1, 2])
            .params([18])
            .row_process(Box::new(|row: &mut Row| {
                row.insert("tag", Value::from("a"));
            }))
            .row_process(Box::new(|row: &mut Row| {
                let tag = row.get("tag").map(|v| v.to_string()).unwrap_or_default();
                row.insert("tag", Value::from(tag + "b"));
            }))
            .columns(vec![Column::new("X", "x")])
            .columns(vec![Column::new("Tag", "tag")]);
        report.run().unwrap();

        assert_eq!(report.rows()[0].get("tag"), Some(&Value::from("ab")));
        assert_eq!(report.column_defs().len(), 1);
        assert_eq!(
            report.output(),
            "<table><thead><tr><th>Tag</th></tr></thead><tbody><tr><td>ab</td></tr><tr><td>ab</td></tr></tbody></table>"
        );
    }

    #[test]
    fn output_before_run_renders_empty_table() {
        let source = MemoryDataSource::new();
        let report = Reporter::new(&source).columns(vec![Column::new("ID", "id").with_total()]);
        assert_eq!(
            report.output(),
            "<table><thead><tr><th>ID</th></tr></thead><tbody></tbody><tfoot><tr><td>0</td></tr></tfoot></table>"
        );
        assert_eq!(source.calls().len(), 0);
    }

    #[test]
    fn scan_failure_discards_rows_and_releases_cursor() {
        let source = MemoryDataSource::new().with_result(
            "q",
            MemoryResult::new(["id"])
                .row([Value::Int64(1)])
                .failing_row("cannot decode"),
        );
        let mut report = Reporter::new(&source).query("q");
        let err = report.run().unwrap_err();

        assert!(matches!(err, ReportError::Scan { row: 1, .. }));
        assert!(report.rows().is_empty());
        assert_eq!(source.opened_cursors(), 1);
        assert_eq!(source.released_cursors(), 1);
    }

    #[test]
    fn record_width_mismatch_is_a_scan_error() {
        let source = MemoryDataSource::new().with_result(
            "q",
            MemoryResult::new(["a", "b"]).row([Value::Int64(1)]),
        );
        let mut report = Reporter::new(&source).query("q");
        let err = report.run().unwrap_err();
        assert!(matches!(err, ReportError::Scan { row: 0, .. }));
        assert_eq!(source.released_cursors(), 1);
    }

    #[test]
    fn rerun_replaces_rows_and_failure_clears_them() {
        let source = users();
        let mut report = Reporter::new(&source).query(QUERY).params([18]);
        report.run().unwrap();
        report.run().unwrap();
        assert_eq!(report.rows().len(), 2);

        let mut report = report.params(Vec::<Value>::new());
        assert!(matches!(report.run(), Err(ReportError::Query { .. })));
        assert!(report.rows().is_empty());
    }

    #[test]
    fn observer_sees_success_failure_and_alerts() {
        let source = users();
        let counting = Arc::new(Counting::default());

        let mut report = Reporter::new(&source)
            .name("adults")
            .query(QUERY)
            .params([18])
            .with_observer(counting.clone());
        report.run().unwrap();

        let mut broken = Reporter::new(&source)
            .query("SELECT missing")
            .with_observer(counting.clone());
        assert!(broken.run().is_err());

        assert_eq!(counting.ok.load(Ordering::SeqCst), 1);
        assert_eq!(counting.failed.load(Ordering::SeqCst), 1);
        assert_eq!(counting.alerts.load(Ordering::SeqCst), 1);
    }
}

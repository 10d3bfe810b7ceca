//! `rapid-reporter` turns declarative report definitions into rendered tabular reports.
//!
//! A report is described in a small Report Definition Language (RDL): a name, a parameterized
//! query, the parameter names, derived row fields and the output columns. The report executor
//! ([`Reporter`]) runs the query against a [`source::DataSource`], applies the derived fields to
//! every row and renders the rows through a pluggable visualizer (an HTML table by default).
//!
//! The primary entrypoints are [`rdl::parse`] and [`Reporter::from_descriptor`].
//!
//! ## What a definition looks like
//!
//! ```text
//! report "customer report" {
//!     query "SELECT first_name, qty, price FROM invoices WHERE business_id = ?"
//!     params [ "businessId" ]
//!     processes [ "total" qty price * ]
//!     columns [
//!         label "First Name" key "first_name"
//!         label "Total" key "total"
//!     ]
//! }
//! ```
//!
//! - string literals are stored without quotes, escapes decoded
//! - a row process folds its operator left-to-right over the operand columns; missing or
//!   non-numeric operands count as `0`
//! - footer totals (for columns with `show_total`) follow the same zero-fallback policy
//!
//! ## Quick example: parse and run a report
//!
//! ```rust
//! use rapid_reporter::source::{MemoryDataSource, MemoryResult};
//! use rapid_reporter::types::Value;
//! use rapid_reporter::{rdl, Reporter};
//!
//! # fn main() -> Result<(), rapid_reporter::ReportError> {
//! let report = rdl::parse(
//!     r#"report "r" { query "SELECT a,b FROM t" params []
//!        processes [ "sum" a b + ] columns [ label "Sum" key "sum" ] }"#,
//! )?;
//!
//! let source = MemoryDataSource::new().with_result(
//!     "SELECT a,b FROM t",
//!     MemoryResult::new(["a", "b"])
//!         .row([Value::Int64(1), Value::Int64(2)])
//!         .row([Value::Int64(3), Value::Int64(4)]),
//! );
//!
//! let mut reporter = Reporter::from_descriptor(&source, &report);
//! reporter.run()?;
//! assert_eq!(reporter.rows()[1].get("sum"), Some(&Value::Int64(7)));
//! assert_eq!(
//!     reporter.output(),
//!     "<table><thead><tr><th>Sum</th></tr></thead><tbody>\
//!      <tr><td>3</td></tr><tr><td>7</td></tr></tbody></table>"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`rdl`]: lexer, parser and pretty-printer for report definitions
//! - [`reporter`]: the report executor, run options and observer hooks
//! - [`source`]: the data source contract, an in-memory source and (feature `sqlite`) SQLite
//! - [`processing`]: row-process folding and footer totals
//! - [`render`]: HTML table, CSV and JSON visualizers
//! - [`execution`]: parallel execution of independent reports with live metrics
//! - [`catalog`]: loading report definition files from a directory or glob pattern
//! - [`types`]: row values, rows and column definitions
//! - [`error`]: the error type shared by all of the above

pub mod catalog;
pub mod error;
pub mod execution;
pub mod processing;
pub mod rdl;
pub mod render;
pub mod reporter;
pub mod source;
pub mod types;

pub use error::{ReportError, ReportResult};
pub use rdl::ReportDescriptor;
pub use reporter::Reporter;

//! Row transformations and aggregation.
//!
//! - [`RowProcess`]: a derived field, folding an [`Operator`] left-to-right over named columns
//! - [`column_totals`]: footer sums for columns with `show_total`
//!
//! Both follow the same lenient numeric policy: missing or non-numeric values count as `0`.
//!
//! ```rust
//! use rapid_reporter::processing::{Operator, RowProcess};
//! use rapid_reporter::types::{Row, Value};
//!
//! let mut row: Row = [("qty", Value::Int64(3)), ("price", Value::Float64(2.5))]
//!     .into_iter()
//!     .collect();
//! RowProcess::new("total", ["qty", "price"], Operator::Mul).apply(&mut row);
//! assert_eq!(row.get("total"), Some(&Value::Float64(7.5)));
//! ```

pub mod fold;
pub mod totals;

pub use fold::{Operator, RowProcess, RowProcessFn};
pub use totals::{column_totals, has_totals, Total};

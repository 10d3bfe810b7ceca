//! Report Definition Language (RDL).
//!
//! An RDL source declares a report's name, query template, parameter names, derived row fields
//! and output columns:
//!
//! ```text
//! report "customer report" {
//!     query "SELECT first_name, last_name, qty, price FROM invoices WHERE business_id = ?"
//!     params [ "businessId" ]
//!     processes [
//!         "total" qty price *
//!     ]
//!     columns [
//!         label "First Name" key "first_name"
//!         label "Total" key "total"
//!     ]
//! }
//! ```
//!
//! Whitespace and comments (`//`, `/* */`) are insignificant; the four sections appear in this
//! fixed order. String literals are stored **without** their quotes and with escapes decoded
//! (`"a \"b\""` becomes `a "b"`), for every string field alike.
//!
//! ```rust
//! use rapid_reporter::processing::Operator;
//!
//! let report = rapid_reporter::rdl::parse(
//!     r#"report "r" { query "SELECT a, b FROM t" params []
//!        processes [ "sum" a b + ] columns [ label "Sum" key "sum" ] }"#,
//! )
//! .unwrap();
//! assert_eq!(report.name, "r");
//! assert_eq!(report.row_processes[0].operand_keys, vec!["a", "b"]);
//! assert_eq!(report.row_processes[0].operator, Operator::Add);
//! ```

mod descriptor;
mod error;
mod lexer;
mod parser;
mod token;

pub use descriptor::ReportDescriptor;
pub use error::{Span, SyntaxError};
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenKind};

use crate::error::ReportResult;

/// Parse RDL source text into a [`ReportDescriptor`].
///
/// Deterministic: identical input yields an identical descriptor or an identical error.
pub fn parse(input: &str) -> ReportResult<ReportDescriptor> {
    Ok(Parser::new(input).parse()?)
}

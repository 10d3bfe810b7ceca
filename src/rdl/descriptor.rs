use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};
use crate::processing::RowProcess;
use crate::types::{Column, Value};

use super::error::SyntaxError;
use super::parser::Parser;

/// The parsed form of an RDL report definition.
///
/// All string fields hold the literal's contents without the surrounding quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDescriptor {
    /// Display name of the report.
    pub name: String,
    /// Query template with positional placeholders.
    pub query: String,
    /// Declared parameter names, in placeholder order. Values are supplied at execution time.
    pub params: Vec<String>,
    /// Derived-field declarations, applied in order to every row.
    pub row_processes: Vec<RowProcess>,
    /// Output columns. Parsed columns never have `show_total` set.
    pub columns: Vec<Column>,
}

impl ReportDescriptor {
    /// Order named parameter values by the declared parameter names.
    ///
    /// Extra entries in `values` are ignored.
    pub fn bind_params(&self, values: &HashMap<String, Value>) -> ReportResult<Vec<Value>> {
        self.params
            .iter()
            .map(|name| {
                values
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ReportError::MissingParam { name: name.clone() })
            })
            .collect()
    }

    /// The declared columns, with `show_total` enabled for every column whose key is in `keys`.
    pub fn columns_with_totals(&self, keys: &[&str]) -> Vec<Column> {
        self.columns
            .iter()
            .map(|col| Column {
                show_total: keys.contains(&col.key.as_str()),
                ..col.clone()
            })
            .collect()
    }
}

impl FromStr for ReportDescriptor {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::new(s).parse()
    }
}

/// Canonical RDL source for this descriptor.
///
/// Operand keys are written as bare identifiers, so descriptors built in code must use
/// identifier-shaped operand keys for the output to parse back.
impl fmt::Display for ReportDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "report {} {{", quote(&self.name))?;
        writeln!(f, "    query {}", quote(&self.query))?;

        write_block(f, "params", &self.params, |f, p| write!(f, "{}", quote(p)))?;
        write_block(f, "processes", &self.row_processes, |f, p| {
            write!(f, "{}", quote(&p.output_key))?;
            for key in &p.operand_keys {
                write!(f, " {key}")?;
            }
            write!(f, " {}", p.operator)
        })?;
        write_block(f, "columns", &self.columns, |f, c| {
            write!(f, "label {} key {}", quote(&c.label), quote(&c.key))
        })?;

        f.write_str("}")
    }
}

fn write_block<T>(
    f: &mut fmt::Formatter<'_>,
    keyword: &str,
    items: &[T],
    mut item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    if items.is_empty() {
        return writeln!(f, "    {keyword} []");
    }
    writeln!(f, "    {keyword} [")?;
    for it in items {
        f.write_str("        ")?;
        item(f, it)?;
        writeln!(f)?;
    }
    writeln!(f, "    ]")
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::ReportDescriptor;
    use crate::error::ReportError;
    use crate::types::Value;

    const INVOICES: &str = r#"
report "invoice \"lines\"" {
    query "SELECT qty, price FROM lines WHERE invoice_id = ?"
    params [ "invoiceId" ]
    processes [ "total" qty price * ]
    columns [
        label "Qty" key "qty"
        label "Total" key "total"
    ]
}"#;

    #[test]
    fn display_output_parses_back_to_equal_descriptor() {
        let report: ReportDescriptor = INVOICES.parse().unwrap();
        let printed = report.to_string();
        assert!(printed.starts_with("report \"invoice \\\"lines\\\"\" {\n"));
        assert!(printed.contains("        \"total\" qty price *\n"));

        let reparsed: ReportDescriptor = printed.parse().unwrap();
        assert_eq!(reparsed, report);
    }

    #[test]
    fn display_writes_empty_blocks_inline() {
        let report: ReportDescriptor =
            r#"report "r" { query "q" params [] processes [] columns [] }"#.parse().unwrap();
        assert_eq!(
            report.to_string(),
            "report \"r\" {\n    query \"q\"\n    params []\n    processes []\n    columns []\n}"
        );
    }

    #[test]
    fn bind_params_orders_by_declaration() {
        let report: ReportDescriptor = r#"report "r" { query "q ? ?" params [ "b" "a" ]
            processes [] columns [] }"#
            .parse()
            .unwrap();
        let mut values = HashMap::new();
        values.insert("a".to_string(), Value::Int64(1));
        values.insert("b".to_string(), Value::from("two"));
        values.insert("unused".to_string(), Value::Null);

        assert_eq!(
            report.bind_params(&values).unwrap(),
            vec![Value::from("two"), Value::Int64(1)]
        );

        values.remove("a");
        let err = report.bind_params(&values).unwrap_err();
        assert!(matches!(err, ReportError::MissingParam { name } if name == "a"));
    }

    #[test]
    fn columns_with_totals_marks_selected_keys() {
        let report: ReportDescriptor = INVOICES.parse().unwrap();
        let cols = report.columns_with_totals(&["total"]);
        assert!(!cols[0].show_total);
        assert!(cols[1].show_total);
        assert_eq!(cols[1].label, "Total");
        assert!(report.columns.iter().all(|c| !c.show_total));
    }
}

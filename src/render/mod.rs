//! Report visualizers.
//!
//! A visualizer is a pure function from the accumulated rows and the column definitions to a
//! rendered string. It must handle an empty row set.
//!
//! Built-in visualizers:
//!
//! - [`html::table_visualizer`]: the default HTML table with an optional totals footer
//! - [`csv::csv_visualizer`]: CSV with a header record and an optional totals record
//! - [`json::json_visualizer`]: a JSON document with columns, rows and totals

pub mod csv;
pub mod html;
pub mod json;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::types::{Column, Row};

pub use self::csv::csv_visualizer;
pub use self::html::table_visualizer;
pub use self::json::json_visualizer;

/// Pluggable rendering function.
pub type Visualizer = Arc<dyn Fn(&[Row], &[Column]) -> String + Send + Sync>;

/// Built-in output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// HTML `<table>` (the default).
    #[default]
    Html,
    /// Comma-separated values.
    Csv,
    /// JSON document.
    Json,
}

impl OutputFormat {
    /// Render `rows` with this format's visualizer.
    pub fn render(self, rows: &[Row], columns: &[Column]) -> String {
        match self {
            OutputFormat::Html => table_visualizer(rows, columns),
            OutputFormat::Csv => csv_visualizer(rows, columns),
            OutputFormat::Json => json_visualizer(rows, columns),
        }
    }

    /// This format's visualizer as a [`Visualizer`] value.
    pub fn visualizer(self) -> Visualizer {
        Arc::new(move |rows: &[Row], columns: &[Column]| self.render(rows, columns))
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    /// Parse a format name (case-insensitive): `html`, `csv` or `json`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" | "table" => Ok(Self::Html),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Html => "html",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        })
    }
}

/// For each column, whether its values are numeric.
///
/// A column is numeric when the first non-null value found at its key is an integer or float.
/// Missing and null cells in numeric columns render as `0`, elsewhere as the empty string.
pub(crate) fn numeric_columns(rows: &[Row], columns: &[Column]) -> Vec<bool> {
    columns
        .iter()
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(&col.key))
                .find(|v| !v.is_null())
                .is_some_and(|v| v.is_numeric())
        })
        .collect()
}

/// Default string form of the cell at `key`.
pub(crate) fn cell_text(row: &Row, key: &str, numeric: bool) -> String {
    match row.get(key) {
        Some(v) if !v.is_null() => v.to_string(),
        _ if numeric => "0".to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{cell_text, numeric_columns, OutputFormat};
    use crate::types::{Column, Row, Value};

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!("HTML".parse::<OutputFormat>(), Ok(OutputFormat::Html));
        assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("Json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().to_string(), "html");
    }

    #[test]
    fn missing_cells_render_zero_value_of_column_kind() {
        let rows: Vec<Row> = vec![
            [("n", Value::Null), ("s", Value::from("a"))].into_iter().collect(),
            [("n", Value::Int64(4))].into_iter().collect(),
        ];
        let cols = vec![Column::new("N", "n"), Column::new("S", "s"), Column::new("X", "x")];
        let numeric = numeric_columns(&rows, &cols);
        assert_eq!(numeric, vec![true, false, false]);

        assert_eq!(cell_text(&rows[0], "n", numeric[0]), "0");
        assert_eq!(cell_text(&rows[1], "s", numeric[1]), "");
        assert_eq!(cell_text(&rows[1], "x", numeric[2]), "");
        assert_eq!(cell_text(&rows[1], "n", numeric[0]), "4");
    }

    #[test]
    fn visualizer_value_matches_render() {
        let cols = vec![Column::new("A", "a")];
        let rows: Vec<Row> = vec![[("a", Value::Int64(1))].into_iter().collect()];
        let vis = OutputFormat::Csv.visualizer();
        assert_eq!(vis(&rows, &cols), OutputFormat::Csv.render(&rows, &cols));
    }
}

//! Default HTML table visualizer.

use crate::processing::{column_totals, has_totals};
use crate::types::{Column, Row};

use super::{cell_text, numeric_columns};

/// Render rows as an HTML `<table>`.
///
/// - `<thead>`: one `<th>` per column with its label
/// - `<tbody>`: one `<tr>` per row, one `<td>` per column with the value at the column's key
/// - `<tfoot>`: only if some column has `show_total`; totals in those columns, empty cells
///   elsewhere
///
/// Labels and cell text are HTML-escaped. The output is a single line with no whitespace
/// between tags.
///
/// ```rust
/// use rapid_reporter::render::table_visualizer;
/// use rapid_reporter::types::{Column, Row, Value};
///
/// let rows: Vec<Row> = vec![
///     [("id", Value::Int64(1)), ("amount", Value::Float64(100.0))].into_iter().collect(),
///     [("id", Value::Int64(2)), ("amount", Value::Float64(150.0))].into_iter().collect(),
/// ];
/// let columns = vec![Column::new("ID", "id"), Column::new("Amount", "amount").with_total()];
///
/// assert_eq!(
///     table_visualizer(&rows, &columns),
///     "<table><thead><tr><th>ID</th><th>Amount</th></tr></thead><tbody>\
///      <tr><td>1</td><td>100</td></tr><tr><td>2</td><td>150</td></tr></tbody>\
///      <tfoot><tr><td></td><td>250</td></tr></tfoot></table>"
/// );
/// ```
pub fn table_visualizer(rows: &[Row], columns: &[Column]) -> String {
    let mut html = String::from("<table><thead><tr>");
    for col in columns {
        html.push_str(&format!("<th>{}</th>", escape(&col.label)));
    }
    html.push_str("</tr></thead><tbody>");

    let numeric = numeric_columns(rows, columns);
    for row in rows {
        html.push_str("<tr>");
        for (col, &is_numeric) in columns.iter().zip(&numeric) {
            html.push_str(&format!("<td>{}</td>", escape(&cell_text(row, &col.key, is_numeric))));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody>");

    if has_totals(columns) {
        html.push_str("<tfoot><tr>");
        for total in column_totals(rows, columns) {
            match total {
                Some(sum) => html.push_str(&format!("<td>{sum}</td>")),
                None => html.push_str("<td></td>"),
            }
        }
        html.push_str("</tr></tfoot>");
    }

    html.push_str("</table>");
    html
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::table_visualizer;
    use crate::types::{Column, Row, Value};

    fn row(pairs: Vec<(&str, Value)>) -> Row {
        pairs.into_iter().collect()
    }

    fn amount_columns() -> Vec<Column> {
        vec![
            Column::new("ID", "id"),
            Column::new("Amount", "amount").with_total(),
            Column::new("Name", "name"),
        ]
    }

    #[test]
    fn mixed_types_total_as_float() {
        let rows = vec![
            row(vec![("id", Value::Int64(1)), ("amount", Value::Float64(100.5)), ("name", "John".into())]),
            row(vec![("id", Value::Int64(2)), ("amount", Value::Int64(50)), ("name", "Jane".into())]),
            row(vec![("id", Value::Int64(3)), ("amount", Value::Float64(200.25)), ("name", "Doe".into())]),
        ];

        let expected = "<table><thead><tr><th>ID</th><th>Amount</th><th>Name</th></tr></thead><tbody><tr><td>1</td><td>100.5</td><td>John</td></tr><tr><td>2</td><td>50</td><td>Jane</td></tr><tr><td>3</td><td>200.25</td><td>Doe</td></tr></tbody><tfoot><tr><td></td><td>350.75</td><td></td></tr></tfoot></table>";
        assert_eq!(table_visualizer(&rows, &amount_columns()), expected);
    }

    #[test]
    fn string_amount_renders_verbatim_and_totals_zero() {
        let rows = vec![
            row(vec![("id", Value::Int64(1)), ("amount", Value::Float64(100.5)), ("name", "John".into())]),
            row(vec![("id", Value::Int64(2)), ("amount", "invalid".into()), ("name", "Jane".into())]),
            row(vec![("id", Value::Int64(3)), ("amount", Value::Float64(200.25)), ("name", "Doe".into())]),
        ];

        let expected = "<table><thead><tr><th>ID</th><th>Amount</th><th>Name</th></tr></thead><tbody><tr><td>1</td><td>100.5</td><td>John</td></tr><tr><td>2</td><td>invalid</td><td>Jane</td></tr><tr><td>3</td><td>200.25</td><td>Doe</td></tr></tbody><tfoot><tr><td></td><td>300.75</td><td></td></tr></tfoot></table>";
        assert_eq!(table_visualizer(&rows, &amount_columns()), expected);
    }

    #[test]
    fn no_footer_without_total_columns() {
        let rows = vec![row(vec![("id", Value::Int64(1))])];
        let cols = vec![Column::new("ID", "id")];
        assert_eq!(
            table_visualizer(&rows, &cols),
            "<table><thead><tr><th>ID</th></tr></thead><tbody><tr><td>1</td></tr></tbody></table>"
        );
    }

    #[test]
    fn zero_rows_render_header_and_zero_totals() {
        assert_eq!(
            table_visualizer(&[], &amount_columns()),
            "<table><thead><tr><th>ID</th><th>Amount</th><th>Name</th></tr></thead><tbody></tbody><tfoot><tr><td></td><td>0</td><td></td></tr></tfoot></table>"
        );
    }

    #[test]
    fn missing_numeric_cell_renders_zero() {
        let rows = vec![
            row(vec![("id", Value::Int64(1)), ("amount", Value::Int64(5))]),
            row(vec![("id", Value::Int64(2))]),
        ];
        let cols = vec![Column::new("ID", "id"), Column::new("Amount", "amount"), Column::new("Name", "name")];
        assert_eq!(
            table_visualizer(&rows, &cols),
            "<table><thead><tr><th>ID</th><th>Amount</th><th>Name</th></tr></thead><tbody><tr><td>1</td><td>5</td><td></td></tr><tr><td>2</td><td>0</td><td></td></tr></tbody></table>"
        );
    }

    #[test]
    fn labels_and_cells_are_escaped() {
        let rows = vec![row(vec![("note", "<b>Tom & Jerry</b>".into())])];
        let cols = vec![Column::new("Note \"quoted\"", "note")];
        assert_eq!(
            table_visualizer(&rows, &cols),
            "<table><thead><tr><th>Note &quot;quoted&quot;</th></tr></thead><tbody><tr><td>&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;</td></tr></tbody></table>"
        );
    }
}

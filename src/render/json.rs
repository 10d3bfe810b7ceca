//! JSON visualizer.

use serde::Serialize;

use crate::error::ReportResult;
use crate::processing::{column_totals, has_totals};
use crate::types::{Column, Row, Value};

#[derive(Serialize)]
struct JsonTable<'a> {
    columns: Vec<&'a str>,
    rows: Vec<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    totals: Option<Vec<Option<Value>>>,
}

/// Render rows as a compact JSON document:
///
/// ```json
/// {"columns":["ID","Amount"],"rows":[[1,100.5],[2,50]],"totals":[null,150.5]}
/// ```
///
/// Rows are arrays aligned with `columns` (labels). Missing cells are `null`. `totals` is present
/// only if some column has `show_total`.
pub fn json_visualizer(rows: &[Row], columns: &[Column]) -> String {
    write_json(rows, columns).unwrap_or_default()
}

/// Render rows as JSON, surfacing serializer errors.
pub fn write_json(rows: &[Row], columns: &[Column]) -> ReportResult<String> {
    let table = JsonTable {
        columns: columns.iter().map(|c| c.label.as_str()).collect(),
        rows: rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| row.get(&c.key).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect(),
        totals: has_totals(columns).then(|| {
            column_totals(rows, columns)
                .into_iter()
                .map(|total| total.map(|sum| sum.into_value()))
                .collect()
        }),
    };
    Ok(serde_json::to_string(&table)?)
}

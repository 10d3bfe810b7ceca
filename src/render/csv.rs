//! CSV visualizer.

use crate::error::ReportResult;
use crate::processing::{column_totals, has_totals};
use crate::types::{Column, Row};

use super::{cell_text, numeric_columns};

/// Render rows as CSV: a header record of labels, one record per row and, if some column has
/// `show_total`, a trailing totals record.
///
/// Writing into memory cannot fail; should the writer ever report an error, the result is empty.
pub fn csv_visualizer(rows: &[Row], columns: &[Column]) -> String {
    write_csv(rows, columns).unwrap_or_default()
}

/// Render rows as CSV, surfacing writer errors.
pub fn write_csv(rows: &[Row], columns: &[Column]) -> ReportResult<String> {
    let mut wtr = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    wtr.write_record(columns.iter().map(|c| c.label.as_str()))?;

    let numeric = numeric_columns(rows, columns);
    for row in rows {
        wtr.write_record(
            columns
                .iter()
                .zip(&numeric)
                .map(|(col, &is_numeric)| cell_text(row, &col.key, is_numeric)),
        )?;
    }

    if has_totals(columns) {
        wtr.write_record(
            column_totals(rows, columns)
                .into_iter()
                .map(|total| total.map(|sum| sum.to_string()).unwrap_or_default()),
        )?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ::csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

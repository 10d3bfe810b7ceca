//! Footer totals for report columns.

use crate::types::{Column, Number, Row};

use super::Operator;

/// Running sum for one column.
///
/// Integers and floats contribute their value; anything else (text, null, a missing key)
/// contributes exactly `0`. The sum stays integral while every contribution is an integer, so
/// whole totals render without a decimal point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Total(Number);

impl Total {
    /// Add the value stored at `key` in `row`.
    pub fn add_row(&mut self, row: &Row, key: &str) {
        self.0 = Operator::Add.apply(self.0, row.number(key));
    }

    /// Current sum.
    pub fn value(self) -> Number {
        self.0
    }
}

/// Sum every `show_total` column across `rows`.
///
/// The result is aligned with `columns`: `Some(sum)` for total columns, `None` otherwise.
pub fn column_totals(rows: &[Row], columns: &[Column]) -> Vec<Option<Number>> {
    columns
        .iter()
        .map(|col| {
            col.show_total.then(|| {
                rows.iter()
                    .fold(Total::default(), |mut total, row| {
                        total.add_row(row, &col.key);
                        total
                    })
                    .value()
            })
        })
        .collect()
}

/// Returns `true` if any column requests a footer total.
pub fn has_totals(columns: &[Column]) -> bool {
    columns.iter().any(|col| col.show_total)
}

#[cfg(test)]
mod tests {
    use super::{column_totals, has_totals};
    use crate::types::{Column, Number, Row, Value};

    fn amounts(values: Vec<Value>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| [("amount", v)].into_iter().collect())
            .collect()
    }

    fn columns() -> Vec<Column> {
        vec![Column::new("ID", "id"), Column::new("Amount", "amount").with_total()]
    }

    #[test]
    fn invalid_values_contribute_zero() {
        let rows = amounts(vec![Value::Int64(100), Value::Int64(50), Value::from("invalid")]);
        let totals = column_totals(&rows, &columns());
        assert_eq!(totals, vec![None, Some(Number::Int(150))]);
        assert_eq!(totals[1].unwrap().to_string(), "150");
    }

    #[test]
    fn mixed_int_and_float_sum_renders_as_float_only_when_fractional() {
        let rows = amounts(vec![
            Value::Float64(100.5),
            Value::Int64(50),
            Value::Float64(200.25),
        ]);
        let totals = column_totals(&rows, &columns());
        assert_eq!(totals[1].unwrap().to_string(), "350.75");

        let whole = amounts(vec![Value::Float64(100.0), Value::Float64(150.0)]);
        assert_eq!(column_totals(&whole, &columns())[1].unwrap().to_string(), "250");
    }

    #[test]
    fn nulls_and_missing_keys_contribute_zero() {
        let mut rows = amounts(vec![Value::Null, Value::Int64(7)]);
        rows.push(Row::new());
        assert_eq!(column_totals(&rows, &columns())[1], Some(Number::Int(7)));
    }

    #[test]
    fn zero_rows_total_is_zero() {
        let totals = column_totals(&[], &columns());
        assert_eq!(totals, vec![None, Some(Number::Int(0))]);
    }

    #[test]
    fn has_totals_detects_any_flagged_column() {
        assert!(has_totals(&columns()));
        assert!(!has_totals(&[Column::new("ID", "id")]));
    }
}

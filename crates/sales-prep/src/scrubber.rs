//! Record normalizer.
//!
//! Applies a fixed sequence of cleaning operations to a raw table:
//!
//! 1. trim whitespace from column names
//! 2. drop exact-duplicate rows
//! 3. trim whitespace in designated string columns
//! 4. coerce designated date columns, unparseable values become null
//! 5. drop rows missing any required column
//!
//! The input table is never mutated; cleaning returns a new table.
//! Per-cell problems (a date that fails to parse) are recovered locally
//! by nulling the value; they do not abort the run.

use std::collections::HashSet;

use smartsales_core::{DataTable, Result, Value};

/// Which columns a dataset's cleaning pass touches.
///
/// Column names refer to the trimmed header names. A plan naming a column
/// the table does not have is a caller error and fails the clean.
#[derive(Debug, Clone, Default)]
pub struct CleaningPlan {
    /// Columns whose text values get leading/trailing whitespace stripped.
    pub string_columns: Vec<String>,
    /// Columns coerced to dates; unparseable values become null.
    pub date_columns: Vec<String>,
    /// Columns that must be non-null for a row to survive.
    pub required_columns: Vec<String>,
}

impl CleaningPlan {
    pub fn new(
        string_columns: &[&str],
        date_columns: &[&str],
        required_columns: &[&str],
    ) -> Self {
        Self {
            string_columns: string_columns.iter().map(|s| s.to_string()).collect(),
            date_columns: date_columns.iter().map(|s| s.to_string()).collect(),
            required_columns: required_columns.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Normalize a raw table according to the plan. See the module docs for
/// the fixed operation order.
pub fn clean(table: &DataTable, plan: &CleaningPlan) -> Result<DataTable> {
    // 1. Trim column names.
    let columns: Vec<String> = table
        .columns()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    let mut out = DataTable::new(columns);

    // 2. Drop exact-duplicate rows. The Debug rendering keys on both the
    // value and its type, so Text("1") and Integer(1) never collide.
    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicates = 0usize;
    for row in table.rows() {
        if seen.insert(format!("{:?}", row)) {
            out.push_row(row.clone())?;
        } else {
            duplicates += 1;
        }
    }

    // 3. Trim designated string columns.
    for name in &plan.string_columns {
        let idx = out.require_column(name)?;
        for row in out.rows_mut() {
            if let Value::Text(s) = &row[idx] {
                let trimmed = s.trim();
                if trimmed.len() != s.len() {
                    row[idx] = Value::Text(trimmed.to_string());
                }
            }
        }
    }

    // 4. Coerce designated date columns; anything unparseable goes null.
    let mut coercion_failures = 0usize;
    for name in &plan.date_columns {
        let idx = out.require_column(name)?;
        for row in out.rows_mut() {
            row[idx] = match &row[idx] {
                Value::Date(d) => Value::Date(*d),
                Value::Null => Value::Null,
                Value::Text(s) => match Value::parse_date(s) {
                    Some(d) => Value::Date(d),
                    None => {
                        coercion_failures += 1;
                        Value::Null
                    }
                },
                // Numbers are not dates in these extracts.
                _ => {
                    coercion_failures += 1;
                    Value::Null
                }
            };
        }
    }

    // 5. Drop rows missing any required column.
    let required: Vec<usize> = plan
        .required_columns
        .iter()
        .map(|n| out.require_column(n))
        .collect::<Result<_>>()?;
    let before = out.row_count();
    let columns = out.columns().to_vec();
    let mut kept = DataTable::new(columns);
    for row in out.rows() {
        if required.iter().all(|&i| !row[i].is_null()) {
            kept.push_row(row.clone())?;
        }
    }
    let dropped_missing = before - kept.row_count();

    tracing::info!(
        rows_in = table.row_count(),
        rows_out = kept.row_count(),
        duplicates_dropped = duplicates,
        missing_key_rows_dropped = dropped_missing,
        date_coercion_failures = coercion_failures,
        "Cleaned dataset"
    );
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartsales_core::SalesError;

    fn raw_table() -> DataTable {
        let mut t = DataTable::new(vec![
            " customer_id ".into(),
            "name".into(),
            "join_date".into(),
        ]);
        t.push_row(vec![
            Value::Integer(1),
            Value::Text("  Ann ".into()),
            Value::Text("2024-01-05".into()),
        ])
        .unwrap();
        // Exact duplicate of the first row.
        t.push_row(vec![
            Value::Integer(1),
            Value::Text("  Ann ".into()),
            Value::Text("2024-01-05".into()),
        ])
        .unwrap();
        // Missing customer_id: must be dropped.
        t.push_row(vec![
            Value::Null,
            Value::Text("Bob".into()),
            Value::Text("2024-02-01".into()),
        ])
        .unwrap();
        // Bad date: coerced to null but kept (join_date not required).
        t.push_row(vec![
            Value::Integer(2),
            Value::Text("Cal".into()),
            Value::Text("soon".into()),
        ])
        .unwrap();
        t
    }

    #[test]
    fn test_clean_fixed_order() {
        let plan = CleaningPlan::new(&["name"], &["join_date"], &["customer_id", "name"]);
        let cleaned = clean(&raw_table(), &plan).unwrap();

        assert_eq!(cleaned.columns(), ["customer_id", "name", "join_date"]);
        assert_eq!(cleaned.row_count(), 2);
        assert_eq!(cleaned.value(0, 1), &Value::Text("Ann".into()));
        assert!(matches!(cleaned.value(0, 2), Value::Date(_)));
        assert_eq!(cleaned.value(1, 2), &Value::Null);
    }

    #[test]
    fn test_missing_required_column_rows_dropped() {
        let plan = CleaningPlan::new(&[], &[], &["customer_id"]);
        let cleaned = clean(&raw_table(), &plan).unwrap();
        let idx = cleaned.require_column("customer_id").unwrap();
        assert!(cleaned.rows().iter().all(|r| !r[idx].is_null()));
    }

    #[test]
    fn test_unknown_plan_column_is_an_error() {
        let plan = CleaningPlan::new(&["nope"], &[], &[]);
        let err = clean(&raw_table(), &plan).unwrap_err();
        assert!(matches!(err, SalesError::UnknownColumn(_)));
    }

    #[test]
    fn test_clean_does_not_mutate_input() {
        let raw = raw_table();
        let plan = CleaningPlan::new(&["name"], &["join_date"], &["customer_id"]);
        let _ = clean(&raw, &plan).unwrap();
        assert_eq!(raw.row_count(), 4);
        assert_eq!(raw.columns()[0], " customer_id ");
    }

    #[test]
    fn test_cleaning_is_deterministic() {
        let raw = raw_table();
        let plan = CleaningPlan::new(&["name"], &["join_date"], &["customer_id", "name"]);
        assert_eq!(clean(&raw, &plan).unwrap(), clean(&raw, &plan).unwrap());
    }
}

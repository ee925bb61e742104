//! Missing-value resolver.
//!
//! Replaces every remaining null in a dataset with one caller-supplied
//! literal. The contract is deliberately a single literal for the whole
//! dataset, which can put a text default into an otherwise numeric column;
//! the untyped cell model represents that mixed column faithfully, and
//! downstream analysis relies on it.

use smartsales_core::{DataTable, Result, SalesError, Value};

/// Fill every null cell with `fill`. Returns the number of cells filled.
///
/// Idempotent: after one pass no nulls remain, so a second pass fills
/// nothing. A null fill literal is rejected; it would silently keep the
/// dataset unresolved.
pub fn fill_missing(table: &mut DataTable, fill: &Value) -> Result<usize> {
    if fill.is_null() {
        return Err(SalesError::Configuration(
            "fill value must not be null".to_string(),
        ));
    }

    let mut filled = 0usize;
    for row in table.rows_mut() {
        for cell in row.iter_mut() {
            if cell.is_null() {
                *cell = fill.clone();
                filled += 1;
            }
        }
    }

    tracing::info!(filled, fill = %fill.render(), "Resolved missing values");
    Ok(filled)
}

//! Fact retrieval from the warehouse.

use rusqlite::Connection;
use smartsales_core::{DataTable, Result, Value};

/// Columns of the fact table handed to the cube builder.
const FACT_COLUMNS: &[&str] = &[
    "sale_id",
    "customer_id",
    "product_id",
    "region",
    "sale_date",
    "month",
    "sale_amount_usd",
];

/// Fetch the sale facts joined with the customer dimension, deriving a
/// `month` column (three-letter abbreviation, e.g. `Jan`) from `sale_date`.
/// Unparseable dates get a null month and simply fall into the null group.
pub fn fetch_sales_facts(conn: &Connection) -> Result<DataTable> {
    let mut stmt = conn.prepare(
        "SELECT s.sale_id, s.customer_id, s.product_id, c.region, s.sale_date, s.sale_amount_usd
         FROM sale s
         JOIN customer c ON s.customer_id = c.customer_id",
    )?;

    let mut table = DataTable::new(FACT_COLUMNS.iter().map(|s| s.to_string()).collect());
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let sale_date: Value = row.get(4)?;
        let month = match &sale_date {
            Value::Text(s) => match Value::parse_date(s) {
                Some(d) => Value::Text(d.format("%b").to_string()),
                None => Value::Null,
            },
            _ => Value::Null,
        };
        table.push_row(vec![
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            sale_date,
            month,
            row.get(5)?,
        ])?;
    }

    tracing::debug!(rows = table.row_count(), "Fetched sale facts");
    Ok(table)
}

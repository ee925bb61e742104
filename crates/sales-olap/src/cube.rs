//! Multidimensional cube construction.
//!
//! A cube is a plain `DataTable`: one row per distinct dimension tuple,
//! carrying the sum and mean of the measure, the contributing-row count,
//! and the contributing ids as a JSON array. Grouping is exact-match on
//! the rendered dimension values; groups appear in first-encounter order,
//! which callers must not rely on.

use std::collections::HashMap;

use rusqlite::Connection;
use smartsales_core::{DataTable, PipelineConfig, Result, Value};

use crate::fetch::fetch_sales_facts;

struct Group {
    key: Vec<Value>,
    sum: f64,
    measure_count: usize,
    ids: Vec<serde_json::Value>,
}

fn id_to_json(id: &Value) -> Option<serde_json::Value> {
    match id {
        Value::Null => None,
        Value::Integer(i) => Some(serde_json::Value::from(*i)),
        Value::Float(f) => Some(serde_json::Value::from(*f)),
        other => Some(serde_json::Value::from(other.render())),
    }
}

/// Aggregate `facts` over the given dimension columns.
///
/// Output columns are `<dims...>, <measure>_sum, <measure>_mean,
/// <id>_count, <id>s`. Null measure cells are skipped by the sum and the
/// mean; a group with no numeric measure gets sum 0 and a null mean. Null
/// ids do not contribute to the count or the id list.
pub fn build_cube(
    facts: &DataTable,
    dimensions: &[&str],
    measure: &str,
    id_column: &str,
) -> Result<DataTable> {
    let dim_indices = dimensions
        .iter()
        .map(|d| facts.require_column(d))
        .collect::<Result<Vec<_>>>()?;
    let measure_idx = facts.require_column(measure)?;
    let id_idx = facts.require_column(id_column)?;

    let mut order: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for row in facts.rows() {
        let key: Vec<Value> = dim_indices.iter().map(|&i| row[i].clone()).collect();
        let rendered = key
            .iter()
            .map(Value::render)
            .collect::<Vec<_>>()
            .join("\u{1f}");

        let slot = *order.entry(rendered).or_insert_with(|| {
            groups.push(Group {
                key,
                sum: 0.0,
                measure_count: 0,
                ids: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];

        if let Some(v) = row[measure_idx].as_f64() {
            group.sum += v;
            group.measure_count += 1;
        }
        if let Some(id) = id_to_json(&row[id_idx]) {
            group.ids.push(id);
        }
    }

    let mut columns: Vec<String> = dimensions.iter().map(|d| d.to_string()).collect();
    columns.push(format!("{}_sum", measure));
    columns.push(format!("{}_mean", measure));
    columns.push(format!("{}_count", id_column));
    columns.push(format!("{}s", id_column));

    let mut cube = DataTable::new(columns);
    for group in groups {
        let mean = if group.measure_count > 0 {
            Value::Float(group.sum / group.measure_count as f64)
        } else {
            Value::Null
        };
        let mut row = group.key;
        row.push(Value::Float(group.sum));
        row.push(mean);
        row.push(Value::Integer(group.ids.len() as i64));
        row.push(Value::Text(serde_json::Value::Array(group.ids).to_string()));
        cube.push_row(row)?;
    }

    tracing::info!(
        dimensions = ?dimensions,
        measure,
        groups = cube.row_count(),
        "Built cube"
    );
    Ok(cube)
}

/// Region cube: `(region, product_id, customer_id)` over `sale_amount_usd`.
pub fn build_region_cube(conn: &Connection, config: &PipelineConfig) -> Result<DataTable> {
    let facts = fetch_sales_facts(conn)?;
    let cube = build_cube(
        &facts,
        &["region", "product_id", "customer_id"],
        "sale_amount_usd",
        "sale_id",
    )?;
    cube.write_csv(config.cube_dir.join("multidimensional_olap_region_cube.csv"))?;
    Ok(cube)
}

/// Month cube: `(month, product_id, customer_id)` over `sale_amount_usd`.
pub fn build_month_cube(conn: &Connection, config: &PipelineConfig) -> Result<DataTable> {
    let facts = fetch_sales_facts(conn)?;
    let cube = build_cube(
        &facts,
        &["month", "product_id", "customer_id"],
        "sale_amount_usd",
        "sale_id",
    )?;
    cube.write_csv(config.cube_dir.join("multidimensional_olap_month_cube.csv"))?;
    Ok(cube)
}

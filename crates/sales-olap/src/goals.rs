//! Goal analyzers over the persisted cubes.
//!
//! Both analyzers are read-only over a cube table: they re-group the cube
//! rows along a coarser key, sum the already-aggregated measure, and pick
//! the extreme. Ties break to the first group encountered, relying on the
//! stability of `slice::sort_by`.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use smartsales_core::{DataTable, PipelineConfig, Result};

/// The measure column the goal analyzers consume from the cubes.
const CUBE_MEASURE: &str = "sale_amount_usd_sum";

/// Outcome of the lowest-revenue-region goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRevenue {
    pub region: String,
    pub total_revenue: f64,
}

/// One month's winning product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTopProduct {
    pub month: String,
    pub product_id: String,
    pub total_revenue: f64,
}

/// Persist goal results as CSV, creating parent directories as needed.
fn write_results<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Sum `value_column` per distinct rendered key tuple, in first-encounter
/// order. Null cells contribute nothing to their group's total.
fn sum_by_group(
    table: &DataTable,
    key_columns: &[&str],
    value_column: &str,
) -> Result<Vec<(Vec<String>, f64)>> {
    let key_indices = key_columns
        .iter()
        .map(|c| table.require_column(c))
        .collect::<Result<Vec<_>>>()?;
    let value_idx = table.require_column(value_column)?;

    let mut order: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(Vec<String>, f64)> = Vec::new();

    for row in table.rows() {
        let key: Vec<String> = key_indices.iter().map(|&i| row[i].render()).collect();
        let rendered = key.join("\u{1f}");
        let slot = *order.entry(rendered).or_insert_with(|| {
            groups.push((key, 0.0));
            groups.len() - 1
        });
        if let Some(v) = row[value_idx].as_f64() {
            groups[slot].1 += v;
        }
    }
    Ok(groups)
}

/// Calendar position of a three-letter month label; unknown labels sort
/// after December.
fn month_ordinal(month: &str) -> u32 {
    match month {
        "Jan" => 1,
        "Feb" => 2,
        "Mar" => 3,
        "Apr" => 4,
        "May" => 5,
        "Jun" => 6,
        "Jul" => 7,
        "Aug" => 8,
        "Sep" => 9,
        "Oct" => 10,
        "Nov" => 11,
        "Dec" => 12,
        _ => 13,
    }
}

/// The region with the smallest summed revenue, or `None` for an empty
/// cube. Ties break to the region first encountered in the cube.
pub fn lowest_revenue_region(cube: &DataTable) -> Result<Option<RegionRevenue>> {
    let mut totals = sum_by_group(cube, &["region"], CUBE_MEASURE)?;
    totals.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(totals.into_iter().next().map(|(mut key, total)| {
        let region = key.remove(0);
        tracing::info!(region, total_revenue = total, "Lowest-revenue region");
        RegionRevenue {
            region,
            total_revenue: total,
        }
    }))
}

/// For each month, the product with the largest summed revenue. Ties break
/// to the product first encountered; the result is ordered by calendar
/// month.
pub fn top_product_by_month(cube: &DataTable) -> Result<Vec<MonthTopProduct>> {
    let totals = sum_by_group(cube, &["month", "product_id"], CUBE_MEASURE)?;

    let mut best_slot: HashMap<String, usize> = HashMap::new();
    let mut winners: Vec<MonthTopProduct> = Vec::new();
    for (mut key, total) in totals {
        let product_id = key.pop().unwrap_or_default();
        let month = key.pop().unwrap_or_default();
        match best_slot.get(&month) {
            Some(&slot) if winners[slot].total_revenue >= total => {}
            Some(&slot) => {
                winners[slot] = MonthTopProduct {
                    month,
                    product_id,
                    total_revenue: total,
                };
            }
            None => {
                best_slot.insert(month.clone(), winners.len());
                winners.push(MonthTopProduct {
                    month,
                    product_id,
                    total_revenue: total,
                });
            }
        }
    }

    winners.sort_by(|a, b| month_ordinal(&a.month).cmp(&month_ordinal(&b.month)));
    Ok(winners)
}

/// Read the region cube back, find the lowest-revenue region, and persist
/// the answer to `results/lowest_revenue_region.csv`.
pub fn run_sales_by_region_goal(config: &PipelineConfig) -> Result<Option<RegionRevenue>> {
    let cube = DataTable::read_csv(
        config
            .cube_dir
            .join("multidimensional_olap_region_cube.csv"),
    )?;
    let answer = lowest_revenue_region(&cube)?;

    let rows: Vec<&RegionRevenue> = answer.iter().collect();
    write_results(&config.results_dir.join("lowest_revenue_region.csv"), &rows)?;
    Ok(answer)
}

/// Read the month cube back, find each month's top product, and persist
/// the answer to `results/top_product_by_month.csv`.
pub fn run_top_product_by_month_goal(config: &PipelineConfig) -> Result<Vec<MonthTopProduct>> {
    let cube = DataTable::read_csv(
        config
            .cube_dir
            .join("multidimensional_olap_month_cube.csv"),
    )?;
    let winners = top_product_by_month(&cube)?;
    write_results(
        &config.results_dir.join("top_product_by_month.csv"),
        &winners,
    )?;
    Ok(winners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartsales_core::Value;

    fn region_cube() -> DataTable {
        let mut t = DataTable::new(vec![
            "region".into(),
            "product_id".into(),
            CUBE_MEASURE.into(),
        ]);
        for (region, product, sum) in [
            ("East", 101, 30.0),
            ("West", 101, 5.0),
            ("East", 102, 12.0),
        ] {
            t.push_row(vec![
                Value::Text(region.into()),
                Value::Integer(product),
                Value::Float(sum),
            ])
            .unwrap();
        }
        t
    }

    #[test]
    fn test_lowest_revenue_region() {
        let winner = lowest_revenue_region(&region_cube()).unwrap().unwrap();
        assert_eq!(winner.region, "West");
        assert_eq!(winner.total_revenue, 5.0);
    }

    #[test]
    fn test_lowest_revenue_region_empty_cube() {
        let cube = DataTable::new(vec!["region".into(), CUBE_MEASURE.into()]);
        assert_eq!(lowest_revenue_region(&cube).unwrap(), None);
    }

    #[test]
    fn test_lowest_revenue_tie_breaks_to_first_seen() {
        let mut cube = DataTable::new(vec!["region".into(), CUBE_MEASURE.into()]);
        for (region, sum) in [("North", 7.0), ("South", 7.0)] {
            cube.push_row(vec![Value::Text(region.into()), Value::Float(sum)])
                .unwrap();
        }
        let winner = lowest_revenue_region(&cube).unwrap().unwrap();
        assert_eq!(winner.region, "North");
    }

    #[test]
    fn test_top_product_by_month() {
        let mut cube = DataTable::new(vec![
            "month".into(),
            "product_id".into(),
            CUBE_MEASURE.into(),
        ]);
        for (month, product, sum) in [
            ("Jan", 1, 10.0),
            ("Jan", 2, 25.0),
            ("Feb", 1, 40.0),
            ("Feb", 2, 40.0),
        ] {
            cube.push_row(vec![
                Value::Text(month.into()),
                Value::Integer(product),
                Value::Float(sum),
            ])
            .unwrap();
        }

        let winners = top_product_by_month(&cube).unwrap();
        assert_eq!(winners.len(), 2);
        // Calendar order, and the February tie goes to the first-seen
        // product.
        assert_eq!(winners[0].month, "Jan");
        assert_eq!(winners[0].product_id, "2");
        assert_eq!(winners[0].total_revenue, 25.0);
        assert_eq!(winners[1].month, "Feb");
        assert_eq!(winners[1].product_id, "1");
    }

    #[test]
    fn test_top_product_empty_cube() {
        let cube = DataTable::new(vec![
            "month".into(),
            "product_id".into(),
            CUBE_MEASURE.into(),
        ]);
        assert!(top_product_by_month(&cube).unwrap().is_empty());
    }
}

//! Per-dataset preparation drivers.
//!
//! One driver per raw extract: read the raw CSV, audit, clean, resolve
//! missing values, audit again, write the prepared CSV. Each dataset has
//! its own cleaning plan and fill literal.

use smartsales_core::config::{
    CUSTOMERS_PREPARED, P7_PRODUCTS_PREPARED, P7_RETURNS_PREPARED, P7_SALESREPS_PREPARED,
    P7_SALES_PREPARED, PRODUCTS_PREPARED, SALES_PREPARED,
};
use smartsales_core::{DataTable, PipelineConfig, Result, Value};

use crate::audit::audit;
use crate::resolve::fill_missing;
use crate::scrubber::{clean, CleaningPlan};

/// Shared driver: raw CSV in, prepared CSV out, with before/after audits.
fn prepare_dataset(
    config: &PipelineConfig,
    raw_name: &str,
    prepared_name: &str,
    plan: &CleaningPlan,
    fill: Option<Value>,
) -> Result<DataTable> {
    tracing::info!(dataset = raw_name, "Starting dataset prep");

    let raw = DataTable::read_csv(config.raw_dir.join(raw_name))?;
    audit(&raw).log("before cleaning");

    let mut prepared = clean(&raw, plan)?;
    if let Some(fill) = fill {
        fill_missing(&mut prepared, &fill)?;
    }
    audit(&prepared).log("after cleaning");

    let out_path = config.prepared_dir.join(prepared_name);
    prepared.write_csv(&out_path)?;
    tracing::info!(
        dataset = raw_name,
        path = %out_path.display(),
        rows = prepared.row_count(),
        "Finished dataset prep"
    );
    Ok(prepared)
}

pub fn prepare_customers(config: &PipelineConfig) -> Result<DataTable> {
    prepare_dataset(
        config,
        "customers_data.csv",
        CUSTOMERS_PREPARED,
        &CleaningPlan::new(&["name"], &[], &["customer_id", "name"]),
        Some(Value::Text("N/A".into())),
    )
}

/// Products are scrubbed but not filled: the primary product extract keeps
/// its gaps, and the loader's column projection decides what reaches the
/// warehouse.
pub fn prepare_products(config: &PipelineConfig) -> Result<DataTable> {
    prepare_dataset(
        config,
        "products_data.csv",
        PRODUCTS_PREPARED,
        &CleaningPlan::new(&["name"], &[], &[]),
        None,
    )
}

pub fn prepare_sales(config: &PipelineConfig) -> Result<DataTable> {
    prepare_dataset(
        config,
        "sales_data.csv",
        SALES_PREPARED,
        &CleaningPlan::new(&[], &["sale_date"], &["sale_id", "sale_date"]),
        Some(Value::Text("Unknown".into())),
    )
}

pub fn prepare_p7_salesreps(config: &PipelineConfig) -> Result<DataTable> {
    prepare_dataset(
        config,
        "p7_salesreps.csv",
        P7_SALESREPS_PREPARED,
        &CleaningPlan::new(&["sales_rep"], &[], &["region", "sales_rep"]),
        Some(Value::Text("N/A".into())),
    )
}

pub fn prepare_p7_products(config: &PipelineConfig) -> Result<DataTable> {
    prepare_dataset(
        config,
        "p7_products.csv",
        P7_PRODUCTS_PREPARED,
        &CleaningPlan::new(&["name"], &[], &[]),
        Some(Value::Text("Unknown".into())),
    )
}

pub fn prepare_p7_sales(config: &PipelineConfig) -> Result<DataTable> {
    prepare_dataset(
        config,
        "p7_sales.csv",
        P7_SALES_PREPARED,
        &CleaningPlan::new(&[], &["sale_date"], &["sale_id", "sale_date"]),
        Some(Value::Text("Unknown".into())),
    )
}

pub fn prepare_p7_returns(config: &PipelineConfig) -> Result<DataTable> {
    prepare_dataset(
        config,
        "p7_returns.csv",
        P7_RETURNS_PREPARED,
        &CleaningPlan::new(&[], &[], &["order_id", "returned"]),
        Some(Value::Text("Unknown".into())),
    )
}

/// Prepare every dataset, primary set first, then the store-returns set.
pub fn prepare_all(config: &PipelineConfig) -> Result<()> {
    prepare_customers(config)?;
    prepare_products(config)?;
    prepare_sales(config)?;
    prepare_p7_salesreps(config)?;
    prepare_p7_products(config)?;
    prepare_p7_sales(config)?;
    prepare_p7_returns(config)?;
    tracing::info!("All datasets prepared");
    Ok(())
}

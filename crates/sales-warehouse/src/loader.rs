//! Full-reload loaders for both warehouses.
//!
//! Each loader projects the prepared tables down to the warehouse columns,
//! applies the last-mile normalizations that belong to loading rather than
//! cleaning (payment-method domain, currency strings, date re-coercion),
//! then truncates and reloads every table inside a single transaction.
//! Deletes run facts-first and inserts dimensions-first so foreign keys
//! hold at every point; a failed insert rolls the whole load back.

use rusqlite::{params_from_iter, Connection};
use smartsales_core::config::{
    CUSTOMERS_PREPARED, P7_PRODUCTS_PREPARED, P7_RETURNS_PREPARED, P7_SALESREPS_PREPARED,
    P7_SALES_PREPARED, PRODUCTS_PREPARED, SALES_PREPARED,
};
use smartsales_core::schema::PaymentMethod;
use smartsales_core::{DataTable, PipelineConfig, Result, SalesError, Value};

/// Columns each warehouse table is loaded with, in insert order. Extra
/// prepared columns are dropped by projection; a missing one fails the load.
const CUSTOMER_COLUMNS: &[&str] = &[
    "customer_id",
    "name",
    "region",
    "join_date",
    "loyalty_points",
    "preferred_contact_method",
];

const PRODUCT_COLUMNS: &[&str] = &[
    "product_id",
    "name",
    "category",
    "unit_price_usd",
    "year_added",
];

const SALE_COLUMNS: &[&str] = &[
    "sale_id",
    "customer_id",
    "product_id",
    "store_id",
    "campaign_id",
    "sale_date",
    "quantity",
    "sale_amount_usd",
    "discount_amount_usd",
    "payment_method",
];

const P7_PRODUCT_COLUMNS: &[&str] = &["product_id", "category", "sub_category", "name", "cost"];

const P7_SALESREP_COLUMNS: &[&str] = &["region", "sales_rep_name"];

const P7_SALE_COLUMNS: &[&str] = &[
    "sale_id",
    "product_id",
    "sale_date",
    "ship_mode",
    "ship_date",
    "customer_id",
    "customer_name",
    "segment",
    "country",
    "city",
    "state",
    "postal_code",
    "region",
    "quantity",
    "discount",
    "sales",
    "profit",
];

const P7_RETURN_COLUMNS: &[&str] = &["order_id", "returned"];

/// Row counts written by one load, for logging and verification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub customers: usize,
    pub products: usize,
    pub sales: usize,
}

/// Row counts written by one store-returns load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReturnsLoadSummary {
    pub products: usize,
    pub salesreps: usize,
    pub sales: usize,
    pub returns: usize,
}

/// The three prepared datasets feeding the primary warehouse.
#[derive(Debug, Clone)]
pub struct PreparedSmartSales {
    pub customers: DataTable,
    pub products: DataTable,
    pub sales: DataTable,
}

impl PreparedSmartSales {
    pub fn read_from(config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            customers: DataTable::read_csv(config.prepared_dir.join(CUSTOMERS_PREPARED))?,
            products: DataTable::read_csv(config.prepared_dir.join(PRODUCTS_PREPARED))?,
            sales: DataTable::read_csv(config.prepared_dir.join(SALES_PREPARED))?,
        })
    }
}

/// The four prepared datasets feeding the store-returns warehouse.
#[derive(Debug, Clone)]
pub struct PreparedStoreReturns {
    pub products: DataTable,
    pub salesreps: DataTable,
    pub sales: DataTable,
    pub returns: DataTable,
}

impl PreparedStoreReturns {
    pub fn read_from(config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            products: DataTable::read_csv(config.prepared_dir.join(P7_PRODUCTS_PREPARED))?,
            salesreps: DataTable::read_csv(config.prepared_dir.join(P7_SALESREPS_PREPARED))?,
            sales: DataTable::read_csv(config.prepared_dir.join(P7_SALES_PREPARED))?,
            returns: DataTable::read_csv(config.prepared_dir.join(P7_RETURNS_PREPARED))?,
        })
    }
}

/// Insert every row of a projected table, binding cells positionally.
/// Any constraint violation surfaces as `SchemaViolation` with the table
/// name, which aborts the surrounding transaction.
fn insert_rows(tx: &rusqlite::Transaction<'_>, table_name: &str, data: &DataTable) -> Result<usize> {
    let placeholders = vec!["?"; data.column_count()].join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table_name,
        data.columns().join(", "),
        placeholders
    );

    let mut stmt = tx.prepare(&sql)?;
    for row in data.rows() {
        stmt.execute(params_from_iter(row.iter()))
            .map_err(|e| SalesError::SchemaViolation {
                table: table_name.to_string(),
                detail: e.to_string(),
            })?;
    }
    Ok(data.row_count())
}

/// Rewrite the payment_method column into the closed {Credit_Card, Cash}
/// domain. Missing values and unrecognized labels both land on Cash.
fn normalize_payment_methods(sales: &mut DataTable) -> Result<()> {
    let idx = sales.require_column("payment_method")?;
    for row in sales.rows_mut() {
        let method = PaymentMethod::normalize(row[idx].as_str());
        row[idx] = Value::Text(method.to_string());
    }
    Ok(())
}

/// Coerce a column to dates in place. Text that parses becomes a date;
/// everything else (including prep-stage fill literals) becomes null.
fn coerce_date_column(table: &mut DataTable, column: &str) -> Result<()> {
    let idx = table.require_column(column)?;
    let mut dropped = 0usize;
    for row in table.rows_mut() {
        row[idx] = match &row[idx] {
            Value::Date(d) => Value::Date(*d),
            Value::Text(s) => match Value::parse_date(s) {
                Some(d) => Value::Date(d),
                None => {
                    dropped += 1;
                    Value::Null
                }
            },
            _ => {
                dropped += 1;
                Value::Null
            }
        };
    }
    if dropped > 0 {
        tracing::warn!(column, dropped, "Unparseable values coerced to null");
    }
    Ok(())
}

/// Strip currency formatting from a numeric column: `$1,234.56` becomes
/// `1234.56`. Numbers pass through; text that still fails to parse
/// becomes null.
fn coerce_currency_column(table: &mut DataTable, column: &str) -> Result<()> {
    let idx = table.require_column(column)?;
    let mut dropped = 0usize;
    for row in table.rows_mut() {
        row[idx] = match &row[idx] {
            Value::Integer(i) => Value::Float(*i as f64),
            Value::Float(f) => Value::Float(*f),
            Value::Text(s) => {
                let stripped: String = s
                    .trim()
                    .chars()
                    .filter(|c| *c != '$' && *c != ',')
                    .collect();
                match stripped.parse::<f64>() {
                    Ok(f) => Value::Float(f),
                    Err(_) => {
                        dropped += 1;
                        Value::Null
                    }
                }
            }
            _ => Value::Null,
        };
    }
    if dropped > 0 {
        tracing::warn!(column, dropped, "Non-numeric currency values coerced to null");
    }
    Ok(())
}

/// Truncate and reload the primary warehouse from the prepared datasets.
///
/// One transaction covers the whole load: delete the sale facts, then both
/// dimensions, then insert customers, products, and sales in dependency
/// order. On any failure the warehouse keeps its previous contents.
pub fn load_smart_sales(conn: &mut Connection, data: &PreparedSmartSales) -> Result<LoadSummary> {
    let customers = data.customers.select(CUSTOMER_COLUMNS)?;
    let products = data.products.select(PRODUCT_COLUMNS)?;
    let mut sales = data.sales.select(SALE_COLUMNS)?;
    normalize_payment_methods(&mut sales)?;

    let tx = conn.transaction()?;
    tx.execute("DELETE FROM sale", [])?;
    tx.execute("DELETE FROM customer", [])?;
    tx.execute("DELETE FROM product", [])?;

    let summary = LoadSummary {
        customers: insert_rows(&tx, "customer", &customers)?,
        products: insert_rows(&tx, "product", &products)?,
        sales: insert_rows(&tx, "sale", &sales)?,
    };
    tx.commit()?;

    tracing::info!(
        customers = summary.customers,
        products = summary.products,
        sales = summary.sales,
        "Smart-sales warehouse reloaded"
    );
    Ok(summary)
}

/// Truncate and reload the store-returns warehouse.
///
/// Applies the last-mile fixes the raw p7 extracts need: the salesreps
/// `sales_rep` column is renamed to the warehouse's `sales_rep_name`,
/// `sales` and `profit` are stripped of currency formatting, and the two
/// date columns are re-coerced (prep-stage fill literals become null).
pub fn load_store_returns(
    conn: &mut Connection,
    data: &PreparedStoreReturns,
) -> Result<ReturnsLoadSummary> {
    let products = data.products.select(P7_PRODUCT_COLUMNS)?;

    let mut salesreps = data.salesreps.clone();
    if salesreps.column_index("sales_rep").is_some() {
        salesreps.rename_column("sales_rep", "sales_rep_name")?;
    }
    let salesreps = salesreps.select(P7_SALESREP_COLUMNS)?;

    let mut sales = data.sales.select(P7_SALE_COLUMNS)?;
    coerce_date_column(&mut sales, "sale_date")?;
    coerce_date_column(&mut sales, "ship_date")?;
    coerce_currency_column(&mut sales, "sales")?;
    coerce_currency_column(&mut sales, "profit")?;

    let returns = data.returns.select(P7_RETURN_COLUMNS)?;

    let tx = conn.transaction()?;
    tx.execute("DELETE FROM p7_returns", [])?;
    tx.execute("DELETE FROM p7_sales", [])?;
    tx.execute("DELETE FROM p7_products", [])?;
    tx.execute("DELETE FROM p7_salesreps", [])?;

    let summary = ReturnsLoadSummary {
        products: insert_rows(&tx, "p7_products", &products)?,
        salesreps: insert_rows(&tx, "p7_salesreps", &salesreps)?,
        sales: insert_rows(&tx, "p7_sales", &sales)?,
        returns: insert_rows(&tx, "p7_returns", &returns)?,
    };
    tx.commit()?;

    tracing::info!(
        products = summary.products,
        salesreps = summary.salesreps,
        sales = summary.sales,
        returns = summary.returns,
        "Store-returns warehouse reloaded"
    );
    Ok(summary)
}

//! Warehouse schema definitions.
//!
//! Two SQLite schemas, each initialized from a single idempotent DDL batch:
//! the primary smart-sales warehouse (customer/product/sale) and the
//! secondary store-returns warehouse (string-keyed p7_* tables).

use crate::{Result, SalesError};

/// The closed payment-method domain on `sale.payment_method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    CreditCard,
    Cash,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::CreditCard => write!(f, "Credit_Card"),
            PaymentMethod::Cash => write!(f, "Cash"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Credit_Card" => Ok(PaymentMethod::CreditCard),
            "Cash" => Ok(PaymentMethod::Cash),
            _ => Err(SalesError::Configuration(format!(
                "unknown payment method: {}",
                s
            ))),
        }
    }
}

impl PaymentMethod {
    /// Normalize a raw payment-method string into the closed domain:
    /// trim, title-case, and fall back to `Cash` for anything outside
    /// {Credit_Card, Cash}, including missing values.
    pub fn normalize(raw: Option<&str>) -> PaymentMethod {
        match raw {
            Some(s) => match title_case(s.trim()).parse() {
                Ok(method) => method,
                Err(_) => PaymentMethod::Cash,
            },
            None => PaymentMethod::Cash,
        }
    }
}

/// The closed contact-method domain on `customer.preferred_contact_method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactMethod {
    Email,
    Phone,
    Text,
}

impl std::fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactMethod::Email => write!(f, "Email"),
            ContactMethod::Phone => write!(f, "Phone"),
            ContactMethod::Text => write!(f, "Text"),
        }
    }
}

impl std::str::FromStr for ContactMethod {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Email" => Ok(ContactMethod::Email),
            "Phone" => Ok(ContactMethod::Phone),
            "Text" => Ok(ContactMethod::Text),
            _ => Err(SalesError::Configuration(format!(
                "unknown contact method: {}",
                s
            ))),
        }
    }
}

/// Title-case a string the way the cleaning rules expect: the first letter
/// of every run of alphabetic characters is uppercased, the rest lowercased,
/// and non-alphabetic characters (underscores included) start a new run.
/// `"credit_card"` becomes `"Credit_Card"`, `"CASH"` becomes `"Cash"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Initialize the primary smart-sales warehouse schema.
///
/// Dimension tables first (customer, product), then the sale fact table
/// with foreign keys into both. Idempotent: every statement is
/// `CREATE TABLE IF NOT EXISTS`.
pub fn init_smart_sales_schema(conn: &rusqlite::Connection) -> Result<()> {
    let ddl = r#"
    CREATE TABLE IF NOT EXISTS customer (
      customer_id INTEGER PRIMARY KEY,
      name TEXT NOT NULL,
      region TEXT,
      join_date TEXT,
      loyalty_points INTEGER DEFAULT 0,
      preferred_contact_method TEXT CHECK(preferred_contact_method IN ('Email', 'Phone', 'Text'))
    );

    CREATE TABLE IF NOT EXISTS product (
      product_id INTEGER PRIMARY KEY,
      name TEXT NOT NULL,
      category TEXT,
      unit_price_usd REAL NOT NULL,
      year_added INTEGER CHECK(year_added >= 2000)
    );

    CREATE TABLE IF NOT EXISTS sale (
      sale_id INTEGER PRIMARY KEY,
      customer_id INTEGER,
      product_id INTEGER,
      store_id INTEGER,
      campaign_id INTEGER,
      sale_date DATE,
      quantity INTEGER NOT NULL,
      sale_amount_usd REAL NOT NULL,
      discount_amount_usd REAL DEFAULT 0,
      payment_method TEXT CHECK(payment_method IN ('Credit_Card', 'Cash')),
      FOREIGN KEY (customer_id) REFERENCES customer(customer_id),
      FOREIGN KEY (product_id) REFERENCES product(product_id)
    );

    CREATE INDEX IF NOT EXISTS idx_sale_customer_id ON sale(customer_id);
    CREATE INDEX IF NOT EXISTS idx_sale_product_id ON sale(product_id);
    CREATE INDEX IF NOT EXISTS idx_sale_sale_date ON sale(sale_date);
    "#;

    conn.execute_batch(ddl)?;
    Ok(())
}

/// Initialize the secondary store-returns warehouse schema.
///
/// String-keyed variant: p7_products and p7_salesreps are the dimensions,
/// p7_sales and p7_returns the facts.
pub fn init_store_returns_schema(conn: &rusqlite::Connection) -> Result<()> {
    let ddl = r#"
    CREATE TABLE IF NOT EXISTS p7_products (
      product_id VARCHAR(20) PRIMARY KEY,
      category VARCHAR(50),
      sub_category VARCHAR(50),
      name VARCHAR(255),
      cost DECIMAL(10, 2)
    );

    CREATE TABLE IF NOT EXISTS p7_salesreps (
      region VARCHAR(50) PRIMARY KEY,
      sales_rep_name VARCHAR(100) NOT NULL
    );

    CREATE TABLE IF NOT EXISTS p7_sales (
      row_id INTEGER PRIMARY KEY,
      sale_id VARCHAR(20) NOT NULL,
      product_id VARCHAR(20) NOT NULL,
      sale_date DATE NOT NULL,
      ship_mode VARCHAR(50),
      ship_date DATE,
      customer_id VARCHAR(20) NOT NULL,
      customer_name VARCHAR(100),
      segment VARCHAR(50),
      country VARCHAR(50),
      city VARCHAR(50),
      state VARCHAR(50),
      postal_code VARCHAR(20),
      region VARCHAR(50),
      quantity INTEGER NOT NULL,
      discount DECIMAL(5, 2),
      sales DECIMAL(10, 2),
      profit DECIMAL(10, 2),
      FOREIGN KEY (product_id) REFERENCES p7_products(product_id),
      FOREIGN KEY (region) REFERENCES p7_salesreps(region)
    );

    CREATE TABLE IF NOT EXISTS p7_returns (
      order_id VARCHAR(20) PRIMARY KEY NOT NULL,
      returned VARCHAR(20) NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_p7_sales_product_id ON p7_sales(product_id);
    CREATE INDEX IF NOT EXISTS idx_p7_sales_region ON p7_sales(region);
    "#;

    conn.execute_batch(ddl)?;
    Ok(())
}

//! Load tests for the store-returns warehouse.

use smartsales_core::{DataTable, Value};
use smartsales_warehouse::loader::{load_store_returns, PreparedStoreReturns};
use smartsales_warehouse::{WarehouseKind, WarehouseStore};

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn prepared() -> PreparedStoreReturns {
    let mut products = DataTable::new(
        ["product_id", "category", "sub_category", "name", "cost"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    products
        .push_row(vec![
            text("FUR-BO-10001798"),
            text("Furniture"),
            text("Bookcases"),
            text("Somerset Bookcase"),
            Value::Float(120.50),
        ])
        .unwrap();

    // Raw extract header is `sales_rep`; the warehouse column is
    // `sales_rep_name`.
    let mut salesreps = DataTable::new(
        ["region", "sales_rep"].iter().map(|s| s.to_string()).collect(),
    );
    salesreps.push_row(vec![text("South"), text("Dana Teague")]).unwrap();

    let mut sales = DataTable::new(
        [
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
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    );
    sales
        .push_row(vec![
            text("CA-2024-1001"),
            text("FUR-BO-10001798"),
            text("2024-01-05"),
            text("Second Class"),
            text("Unknown"),
            text("CG-12520"),
            text("Claire Gute"),
            text("Consumer"),
            text("United States"),
            text("Henderson"),
            text("Kentucky"),
            text("42420"),
            text("South"),
            Value::Integer(2),
            Value::Float(0.0),
            text("$1,261.96"),
            text("$41.91"),
        ])
        .unwrap();

    let mut returns = DataTable::new(
        ["order_id", "returned"].iter().map(|s| s.to_string()).collect(),
    );
    returns.push_row(vec![text("CA-2024-1001"), text("Yes")]).unwrap();

    PreparedStoreReturns {
        products,
        salesreps,
        sales,
        returns,
    }
}

#[test]
fn returns_load_applies_last_mile_coercions() {
    let dir = tempfile::tempdir().unwrap();
    let store = WarehouseStore::new(dir.path().join("returns.db"), WarehouseKind::StoreReturns);
    store.create_if_absent().unwrap();

    let mut conn = store.connect().unwrap();
    let summary = load_store_returns(&mut conn, &prepared()).unwrap();
    assert_eq!(summary.sales, 1);
    assert_eq!(summary.returns, 1);

    // Currency formatting stripped, fill literal in ship_date nulled,
    // sales_rep renamed.
    let (sales_amount, ship_date, rep): (f64, Option<String>, String) = conn
        .query_row(
            "SELECT s.sales, s.ship_date, r.sales_rep_name
             FROM p7_sales s JOIN p7_salesreps r ON s.region = r.region",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert!((sales_amount - 1261.96).abs() < 1e-9);
    assert_eq!(ship_date, None);
    assert_eq!(rep, "Dana Teague");
}

#[test]
fn returns_load_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let store = WarehouseStore::new(dir.path().join("returns.db"), WarehouseKind::StoreReturns);
    store.create_if_absent().unwrap();

    let data = prepared();
    let mut conn = store.connect().unwrap();
    let first = load_store_returns(&mut conn, &data).unwrap();
    let second = load_store_returns(&mut conn, &data).unwrap();
    assert_eq!(first, second);

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM p7_sales", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

//! Smart-Sales Warehouse
//!
//! Schema management and loading for the two SQLite warehouses. The store
//! owns a database path; connections are opened with foreign keys enforced
//! and the schema initialized. Loading is a full truncate-and-reload inside
//! one transaction (see [`loader`]).

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use smartsales_core::{schema, PipelineConfig, Result, SalesError};

pub mod loader;

/// Which of the two warehouse schemas a store carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarehouseKind {
    /// Primary warehouse: customer, product, sale.
    SmartSales,
    /// Secondary store-returns warehouse: p7_* tables.
    StoreReturns,
}

/// A SQLite-backed warehouse at a fixed path.
///
/// The pipeline run owns the store exclusively for its duration; there is
/// no locking beyond SQLite's own transaction boundary.
#[derive(Debug, Clone)]
pub struct WarehouseStore {
    path: PathBuf,
    kind: WarehouseKind,
}

impl WarehouseStore {
    pub fn new<P: AsRef<Path>>(path: P, kind: WarehouseKind) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            kind,
        }
    }

    /// The primary warehouse of a pipeline configuration.
    pub fn smart_sales(config: &PipelineConfig) -> Self {
        Self::new(&config.warehouse_db, WarehouseKind::SmartSales)
    }

    /// The secondary store-returns warehouse of a pipeline configuration.
    pub fn store_returns(config: &PipelineConfig) -> Self {
        Self::new(&config.returns_db, WarehouseKind::StoreReturns)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> WarehouseKind {
        self.kind
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    fn init_schema(&self, conn: &Connection) -> Result<()> {
        match self.kind {
            WarehouseKind::SmartSales => schema::init_smart_sales_schema(conn),
            WarehouseKind::StoreReturns => schema::init_store_returns_schema(conn),
        }
    }

    /// Create every table that is missing; existing data is untouched.
    /// Idempotent.
    pub fn create_if_absent(&self) -> Result<()> {
        let conn = self.open()?;
        self.init_schema(&conn)?;
        tracing::info!(path = %self.path.display(), kind = ?self.kind, "Warehouse schema ensured");
        Ok(())
    }

    /// Delete the backing file if present, then recreate every table empty.
    /// Idempotent: the end state is always an empty warehouse.
    pub fn reset(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            tracing::info!(path = %self.path.display(), "Deleted existing warehouse file");
        }
        self.create_if_absent()
    }

    /// Connect to an existing warehouse. The database file must already
    /// exist: a missing store is a `SourceMissing` failure, not something
    /// to silently create mid-pipeline.
    pub fn connect(&self) -> Result<Connection> {
        if !self.exists() {
            return Err(SalesError::SourceMissing(self.path.clone()));
        }
        let conn = self.open()?;
        self.init_schema(&conn)?;
        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = WarehouseStore::new(dir.path().join("dw.db"), WarehouseKind::SmartSales);

        store.reset().unwrap();
        assert!(store.exists());

        // Put a row in, reset again: warehouse must be empty.
        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO customer (customer_id, name) VALUES (1, 'Ann')",
            [],
        )
        .unwrap();
        drop(conn);

        store.reset().unwrap();
        let conn = store.connect().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM customer", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_create_if_absent_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        let store = WarehouseStore::new(dir.path().join("dw.db"), WarehouseKind::SmartSales);

        store.create_if_absent().unwrap();
        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO customer (customer_id, name) VALUES (1, 'Ann')",
            [],
        )
        .unwrap();
        drop(conn);

        store.create_if_absent().unwrap();
        let conn = store.connect().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM customer", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_connect_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = WarehouseStore::new(dir.path().join("absent.db"), WarehouseKind::SmartSales);
        assert!(matches!(
            store.connect().unwrap_err(),
            SalesError::SourceMissing(_)
        ));
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let store = WarehouseStore::new(dir.path().join("dw.db"), WarehouseKind::StoreReturns);
        store.create_if_absent().unwrap();

        let conn = store.connect().unwrap();
        let fk: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }
}

//! Pipeline configuration.
//!
//! One explicit struct threaded through every stage instead of process-wide
//! path constants. The orchestrator (CLI) constructs it once.

use std::path::{Path, PathBuf};

// Prepared dataset file names: the contract between the prep stage (which
// writes them) and the warehouse loader (which reads them back).
pub const CUSTOMERS_PREPARED: &str = "customers_data_prepared.csv";
pub const PRODUCTS_PREPARED: &str = "products_data_prepared.csv";
pub const SALES_PREPARED: &str = "sales_data_prepared.csv";
pub const P7_SALESREPS_PREPARED: &str = "p7_salesreps_data_prepared.csv";
pub const P7_PRODUCTS_PREPARED: &str = "p7_products_data_prepared.csv";
pub const P7_SALES_PREPARED: &str = "p7_sales_data_prepared.csv";
pub const P7_RETURNS_PREPARED: &str = "p7_returns_data_prepared.csv";

/// File-system layout and store locations for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the raw CSV extracts.
    pub raw_dir: PathBuf,
    /// Directory the prepared (cleaned) CSVs are written to.
    pub prepared_dir: PathBuf,
    /// Directory the cube CSVs are written to.
    pub cube_dir: PathBuf,
    /// Directory the goal-analysis result CSVs are written to.
    pub results_dir: PathBuf,
    /// Path of the primary warehouse database (customer/product/sale).
    pub warehouse_db: PathBuf,
    /// Path of the secondary store-returns database (p7_* tables).
    pub returns_db: PathBuf,
}

impl PipelineConfig {
    /// Build the conventional layout under a single data directory:
    /// `raw/`, `prepared/`, `olap_cubing_outputs/`, `results/`, and the
    /// two warehouse files under `dw/`.
    pub fn from_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            raw_dir: data_dir.join("raw"),
            prepared_dir: data_dir.join("prepared"),
            cube_dir: data_dir.join("olap_cubing_outputs"),
            results_dir: data_dir.join("results"),
            warehouse_db: data_dir.join("dw").join("smart_sales.db"),
            returns_db: data_dir.join("dw").join("store_returns.db"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_from_data_dir() {
        let config = PipelineConfig::from_data_dir("data");
        assert_eq!(config.raw_dir, PathBuf::from("data/raw"));
        assert_eq!(config.prepared_dir, PathBuf::from("data/prepared"));
        assert_eq!(config.warehouse_db, PathBuf::from("data/dw/smart_sales.db"));
        assert_eq!(config.returns_db, PathBuf::from("data/dw/store_returns.db"));
    }
}

//! Smart-Sales OLAP
//!
//! Cube construction and goal analysis over the loaded warehouse. Facts are
//! fetched from the `sale` table, aggregated into multidimensional cubes
//! (persisted as CSV), and the goal analyzers answer the two business
//! questions over those cubes.

pub mod cube;
pub mod fetch;
pub mod goals;

pub use cube::{build_cube, build_month_cube, build_region_cube};
pub use fetch::fetch_sales_facts;
pub use goals::{
    lowest_revenue_region, run_sales_by_region_goal, run_top_product_by_month_goal,
    top_product_by_month, MonthTopProduct, RegionRevenue,
};

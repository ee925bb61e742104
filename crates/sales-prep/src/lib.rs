//! Smart-Sales Prep
//!
//! Turns irregular raw CSV extracts into clean prepared datasets:
//! the record normalizer ([`scrubber`]), the observational consistency
//! auditor ([`audit`]), the missing-value resolver ([`resolve`]), and
//! per-dataset preparation drivers ([`datasets`]).

pub mod audit;
pub mod datasets;
pub mod resolve;
pub mod scrubber;

pub use audit::{audit, ConsistencyReport};
pub use resolve::fill_missing;
pub use scrubber::{clean, CleaningPlan};

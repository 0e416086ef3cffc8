//! User facing output.
//!
//! - [`console`] - colored progress, info, warning and error messages
//! - [`report`] - optimization summary

pub mod console;
mod report;

pub use report::OptimizationReport;

//! Co-expression screening and expression heatmaps for gene-by-sample tables in Rust

pub mod coexpression;
pub mod error;
pub mod expression;
pub mod heatmap;
pub mod report;
pub mod stats;
pub mod types;

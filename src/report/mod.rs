// file: src/report/mod.rs
// description: csv reports and console tables for benchmark and batch runs
// reference: internal module structure

pub mod table;
pub mod writer;

pub use table::render_table;
pub use writer::{ReportRow, ReportWriter};

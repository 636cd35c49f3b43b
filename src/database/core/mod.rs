//! Core database infrastructure
//!
//! This module provides the foundational database components used by the pipeline:
//! - `DuckDbConn`: DuckDB connection wrapper implementing [`SqlEngine`](crate::database::SqlEngine)
//! - `render_value`: VARCHAR-style display rendering of DuckDB values

mod duckdb_conn;
mod value;

pub use duckdb_conn::DuckDbConn;
pub use value::{render_row, render_value};

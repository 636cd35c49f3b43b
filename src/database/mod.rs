//! Database module
//!
//! - `core`: DuckDB connection management and value rendering
//! - `engine`: the [`SqlEngine`] capability and [`QueryResult`] shared by all engines

pub mod core;
mod engine;

pub use self::core::{render_row, render_value, DuckDbConn};
pub use engine::{QueryResult, SqlEngine};

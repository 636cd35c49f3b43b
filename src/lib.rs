#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Shelter Analytics - reset, bootstrap and analyze a shelter database with DuckDB
//!
//! A run executes a fixed, ordered list of SQL files against one on-disk DuckDB
//! database: a clean script, a bootstrap script that loads the CSV sources, and
//! a series of report queries whose results are logged as comma-separated text.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (always) | Pipeline, runners, DuckDB engine, config | `duckdb`, `config`, `tracing` |
//! | `cli` | `shelter` binary and subscriber setup | `clap`, `tracing-subscriber` |
//!
//! # Architecture
//!
//! - **[`sql`]**: reads SQL files, failing with a named error when one is missing
//! - **[`database`]**: the [`SqlEngine`] capability and its DuckDB implementation
//! - **[`pipeline`]**: script/query runners and the step-driven [`Pipeline`]
//! - **[`logging`]**: the [`LogSink`] capability the core logs through
//! - **[`config`]**: directory layout, file and environment overrides
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use shelter_analytics::{Pipeline, PipelineConfig, TracingSink};
//!
//! let config = PipelineConfig::new(&None)?;
//! let summary = Pipeline::new(config).run(&TracingSink)?;
//! println!("{} queries reported", summary.queries_run);
//! ```
//!
//! Tests and embedders can drive the same steps over any engine:
//!
//! ```rust,ignore
//! use shelter_analytics::{DuckDbConn, MemorySink, Pipeline, PipelineConfig};
//!
//! let sink = MemorySink::new();
//! let pipeline = Pipeline::new(PipelineConfig::from_root("/srv/shelter"));
//! pipeline.run_on(DuckDbConn::open_in_memory()?, &sink)?;
//! for line in sink.lines() {
//!     println!("{}", line);
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod sql;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::PipelineConfig;
pub use database::{DuckDbConn, QueryResult, SqlEngine};
pub use error::{PipelineError, Result};
pub use logging::{LogSink, MemorySink, TracingSink};
pub use pipeline::{
    format_query_block, run_sql_query, run_sql_script, Pipeline, PipelineSummary, Stage, Step,
    StepKind, SHELTER_STEPS,
};
pub use sql::read_sql;

#[cfg(feature = "cli")]
pub use logging::init_logging;

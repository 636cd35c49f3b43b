//! DuckDB connection management
//!
//! This module provides the DuckDB connection wrapper the pipeline runs on.
//! The wrapper owns the single on-disk connection for the lifetime of a run
//! and implements [`SqlEngine`] so the runners can execute scripts and queries
//! through it.

use std::path::Path;

use duckdb::types::Value;
use duckdb::Connection;
use tracing::debug;

use super::value::render_row;
use crate::database::engine::{QueryResult, SqlEngine};
use crate::error::Result;

/// Core DuckDB connection wrapper
///
/// `DuckDbConn` owns the connection exclusively. It is released either through
/// [`SqlEngine::close`] or, if the owner unwinds first, when the wrapper drops.
pub struct DuckDbConn {
    conn: Connection,
}

impl DuckDbConn {
    /// Open a database at the specified path
    ///
    /// If the path is `None`, an in-memory database is created.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let conn = match path {
            Some(p) => {
                debug!("opening DuckDB database at '{}'", p.display());
                Connection::open(p)?
            }
            None => Connection::open_in_memory()?,
        };
        Ok(DuckDbConn { conn })
    }

    /// Open a database at the specified path (convenience method)
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Some(path))
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::open(None)
    }

    /// Check if a table exists in the database
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let mut stmt = self.conn.prepare(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ? AND table_schema = 'main'",
        )?;
        let count: i64 = stmt.query_row([table_name], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Get the row count for a table
    pub fn table_count(&self, table_name: &str) -> Result<u64> {
        let query = format!("SELECT COUNT(*) FROM {}", table_name);
        let count: i64 = self.conn.query_row(&query, [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

impl SqlEngine for DuckDbConn {
    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<QueryResult> {
        let mut stmt = self.conn.prepare(sql)?;

        let rows = {
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                let width = row.as_ref().column_count();
                let values = (0..width)
                    .map(|idx| row.get::<_, Value>(idx))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                out.push(render_row(&values));
            }
            out
        };

        // column metadata is only available once the statement has executed
        let columns = stmt.column_names();
        Ok(QueryResult::new(columns, rows))
    }

    fn close(self) -> Result<()> {
        debug!("closing DuckDB connection");
        self.conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }
}

//! Engine capability used by the pipeline runners
//!
//! The runners never talk to DuckDB directly. They only need four things from
//! an engine: run a batch, run a query, report column names and rows, and
//! close. [`SqlEngine`] captures exactly that, which lets tests drive the
//! pipeline with a recording double instead of a real database.

use crate::error::Result;

/// Tabular result of one query
///
/// Values are already rendered to display text by the engine that produced
/// them. Rows keep the order the engine returned them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Column names in result order
    pub columns: Vec<String>,
    /// Rows in engine order, one display string per column
    pub rows: Vec<Vec<String>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Capability set the pipeline needs from a database connection
pub trait SqlEngine {
    /// Execute a script (DDL, COPY, DROP, ...) as a single batch.
    fn execute_batch(&mut self, sql: &str) -> Result<()>;

    /// Execute a SELECT-style statement and materialize the full result.
    fn query(&mut self, sql: &str) -> Result<QueryResult>;

    /// Release the connection.
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_result_counts() {
        let result = QueryResult::new(
            vec!["animal_type".to_string(), "adoptions".to_string()],
            vec![
                vec!["Cat".to_string(), "4".to_string()],
                vec!["Dog".to_string(), "6".to_string()],
            ],
        );
        assert_eq!(result.column_count(), 2);
        assert_eq!(result.row_count(), 2);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_empty_result() {
        let result = QueryResult::new(vec!["branch_id".to_string()], vec![]);
        assert_eq!(result.column_count(), 1);
        assert!(result.is_empty());
    }
}

//! Script and query runners
//!
//! Both runners load SQL text through [`read_sql`], hand it to a [`SqlEngine`]
//! and log what happened to a [`LogSink`]. Errors are returned untouched.

use std::path::Path;

use crate::database::{QueryResult, SqlEngine};
use crate::error::Result;
use crate::logging::LogSink;
use crate::sql::{read_sql, sql_file_name};

/// Width of the horizontal rule framing a query block
pub const RULE_WIDTH: usize = 50;

/// Separator between columns and between values in a row
pub const FIELD_SEPARATOR: &str = ", ";

/// The rule line used above and below the header and after the rows
pub fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Execute a script file (DDL, COPY, DROP, ...) as one batch
///
/// Logs `RUN SCRIPT` once the file has been read and `DONE SCRIPT` only after
/// the engine accepted the whole batch.
pub fn run_sql_script<E: SqlEngine + ?Sized>(
    engine: &mut E,
    path: &Path,
    sink: &dyn LogSink,
) -> Result<()> {
    let name = sql_file_name(path);
    let sql = read_sql(path)?;

    sink.info(&format!("RUN SCRIPT  → {}", name));
    engine.execute_batch(&sql)?;
    sink.info(&format!("DONE SCRIPT → {}", name));
    Ok(())
}

/// Execute a query file and log its full result set
///
/// Returns the result so callers can inspect it; it is not kept anywhere else.
pub fn run_sql_query<E: SqlEngine + ?Sized>(
    engine: &mut E,
    path: &Path,
    sink: &dyn LogSink,
) -> Result<QueryResult> {
    let name = sql_file_name(path);
    let sql = read_sql(path)?;

    sink.info("");
    sink.info(&format!("RUN QUERY   → {}", name));

    let result = engine.query(&sql)?;
    for line in format_query_block(&result) {
        sink.info(&line);
    }
    Ok(result)
}

/// Lay out a result as rule / header / rule / rows / rule
pub fn format_query_block(result: &QueryResult) -> Vec<String> {
    let rule = rule();
    let mut lines = Vec::with_capacity(result.row_count() + 4);

    lines.push(rule.clone());
    lines.push(result.columns.join(FIELD_SEPARATOR));
    lines.push(rule.clone());
    lines.extend(result.rows.iter().map(|row| row.join(FIELD_SEPARATOR)));
    lines.push(rule);
    lines
}
